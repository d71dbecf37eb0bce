//! A crossword grid-filling engine.
//!
//! Given a grid size N (3..=7) and a dictionary of admissible words, the
//! engine produces an N×N arrangement of letters in which every maximal
//! horizontal and vertical run of length >= 3 spells a dictionary word, no
//! word appears twice, and crossing slots agree on their shared letters.
//!
//! The crate is organized around the data flow of a single generation:
//!
//! * [`dictionary`] builds the length-bucketed trie index and answers
//!   pattern-match queries ("all words of length L matching `c?t`").
//! * [`grid`] models the board of empty/block/letter cells, enumerates slots,
//!   and performs exactly-undoable word placement.
//! * [`layout`] produces 180°-symmetric block layouts for the larger sizes.
//! * [`feasibility`] prunes candidate words whose placement would leave some
//!   crossing slot without any dictionary completion.
//! * [`search`] runs the heuristic backtracking fill under explicit backtrack
//!   and restart budgets.
//! * [`numbering`] assigns clue numbers and extracts the across/down entries
//!   from a completed grid.
//! * [`generator`] ties it all together behind
//!   [`generate_filled_grid`](generator::generate_filled_grid).
//!
//! Everything is deterministic: the only randomness source is a caller-seeded
//! generator, so equal configurations produce equal puzzles.

pub mod dictionary;
pub mod error;
pub mod feasibility;
pub mod generator;
pub mod grid;
pub mod layout;
pub mod numbering;
pub mod search;

/// The shortest run of open cells that counts as a slot.
pub const MIN_SLOT_LENGTH: usize = 3;

/// The expected maximum length for a single slot; also the inline capacity of
/// the per-slot SmallVecs (patterns, snapshots, crossings).
pub const MAX_SLOT_LENGTH: usize = 7;

/// Supported grid dimensions.
pub const MIN_GRID_SIZE: usize = 3;
pub const MAX_GRID_SIZE: usize = 7;

pub use dictionary::{DictionaryIndex, Pattern, PatternAtom};
pub use error::GenerationError;
pub use generator::{generate_filled_grid, FilledPuzzle, GenerationConfig, SeedEntry};
pub use grid::{BlockSet, Cell, Crossing, Direction, Grid, Slot, SlotId};
pub use numbering::{Entries, Entry};
pub use search::{CandidateOrdering, SearchLimits, Statistics};
