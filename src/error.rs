//! Error types surfaced by the generation engine.

use std::error::Error;
use std::fmt;

/// Everything that can go wrong between `generate_filled_grid` being called
/// and a puzzle coming back. Per-candidate rejections and backtracking during
/// the search are not errors; they are the search working as intended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// A dictionary candidate contained a non-alphabetic character. Only
    /// strict builds surface this; the lenient default skips the word.
    MalformedWord { word: String },

    /// The dictionary holds too few words of some required slot length to be
    /// worth searching.
    InsufficientDictionary {
        length: usize,
        available: usize,
        required: usize,
    },

    /// No block layout could be produced (or validated) in which every slot
    /// has length >= 3.
    LayoutUnreachable { size: usize },

    /// The requested grid dimension lies outside the supported 3..=7 range.
    SizeOutOfRange { size: usize },

    /// Every attempt ran out of candidates or backtrack budget. Exhaustive
    /// failure and budget exhaustion are deliberately indistinguishable.
    Unsolvable { attempts: usize, backtracks: u64 },

    /// An internal precondition was violated at the given cell. This is a bug
    /// in the caller or the engine, not a property of the input dictionary.
    Invariant {
        row: usize,
        col: usize,
        detail: &'static str,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::MalformedWord { word } => {
                write!(f, "word {word:?} contains a non-alphabetic character")
            }
            GenerationError::InsufficientDictionary {
                length,
                available,
                required,
            } => {
                write!(
                    f,
                    "dictionary has {available} words of length {length}, need at least {required}"
                )
            }
            GenerationError::LayoutUnreachable { size } => {
                write!(f, "no {size}x{size} block layout with all slots >= 3 cells")
            }
            GenerationError::SizeOutOfRange { size } => {
                write!(f, "grid size {size} outside supported range 3..=7")
            }
            GenerationError::Unsolvable {
                attempts,
                backtracks,
            } => {
                write!(
                    f,
                    "no fill found after {attempts} attempts and {backtracks} backtracks"
                )
            }
            GenerationError::Invariant { row, col, detail } => {
                write!(f, "invariant violated at ({row}, {col}): {detail}")
            }
        }
    }
}

impl Error for GenerationError {}
