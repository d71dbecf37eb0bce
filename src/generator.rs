//! The public entry point: configuration, the restart loop around the
//! searcher, and assembly of the final puzzle.

use instant::Instant;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::dictionary::DictionaryIndex;
use crate::error::GenerationError;
use crate::grid::{compute_crossings, BlockSet, Direction, Grid, Slot, SlotId};
use crate::layout::{generate_block_layout, validate_block_layout};
use crate::numbering::{extract_entries, number_cells, Entries};
use crate::search::{CandidateOrdering, Outcome, SearchLimits, Searcher, Statistics};
use crate::{MAX_GRID_SIZE, MIN_GRID_SIZE};

/// A word the caller wants pre-placed on a named slot before the search
/// starts, e.g. a hand-picked word for the first row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    pub direction: Direction,
    pub row: usize,
    pub col: usize,
    pub word: String,
}

/// Configuration for one generation. `new` applies the defaults; fields are
/// public so callers can override selectively.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Grid dimension N, 3..=7.
    pub size: usize,
    /// Seed for the deterministic randomness source.
    pub seed: u64,
    /// Per-attempt backtrack budget.
    pub max_backtracks: usize,
    /// Independent attempts before giving up.
    pub max_restarts: usize,
    /// Per-slot candidate truncation.
    pub candidate_cap: usize,
    /// Candidate ordering policy.
    pub ordering: CandidateOrdering,
    /// Fixed block layout; None lets the engine pick one (all-open for
    /// N <= 4, generated for N >= 5).
    pub block_layout: Option<BlockSet>,
    /// Optional pre-placed first word.
    pub seed_entry: Option<SeedEntry>,
}

impl GenerationConfig {
    pub fn new(size: usize) -> GenerationConfig {
        GenerationConfig {
            size,
            seed: 0,
            max_backtracks: 10_000,
            max_restarts: 3,
            candidate_cap: 150,
            ordering: CandidateOrdering::Heuristic,
            block_layout: None,
            seed_entry: None,
        }
    }
}

/// A completed puzzle: the lettered grid, its slots in canonical order, the
/// numbered across/down entries, the per-cell numbering, and the search
/// statistics that produced it.
#[derive(Debug, Clone)]
pub struct FilledPuzzle {
    pub grid: Grid,
    pub slots: Vec<Slot>,
    pub entries: Entries,
    pub numbering: Vec<Vec<Option<u16>>>,
    pub statistics: Statistics,
}

/// Fill an N×N grid so that every slot spells a distinct dictionary word and
/// crossing slots agree on shared letters.
///
/// The dictionary is borrowed read-only, so one index can serve any number
/// of concurrent generations. Everything else about the run is determined by
/// `config`; equal configs and dictionaries produce equal puzzles.
pub fn generate_filled_grid(
    dictionary: &DictionaryIndex,
    config: &GenerationConfig,
) -> Result<FilledPuzzle, GenerationError> {
    if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&config.size) {
        return Err(GenerationError::SizeOutOfRange { size: config.size });
    }

    let start = Instant::now();
    let mut rng = SmallRng::seed_from_u64(config.seed);

    let blocks = match &config.block_layout {
        Some(blocks) => {
            validate_block_layout(config.size, blocks)?;
            blocks.clone()
        }
        None => generate_block_layout(config.size, &mut rng)?,
    };

    let template = Grid::with_blocks(config.size, &blocks);
    let slots = template.slots();
    if slots.is_empty() {
        return Err(GenerationError::LayoutUnreachable { size: config.size });
    }
    let crossings = compute_crossings(&slots);

    check_dictionary_sufficiency(dictionary, config.size, &slots)?;

    let limits = SearchLimits {
        max_backtracks: config.max_backtracks,
        candidate_cap: config.candidate_cap,
    };
    let attempts = config.max_restarts.max(1);
    let mut statistics = Statistics::default();

    for attempt in 0..attempts {
        let mut grid = template.clone();
        let mut searcher = Searcher::new(
            dictionary,
            &slots,
            &crossings,
            &mut grid,
            &mut rng,
            config.ordering,
            limits.clone(),
        );

        if let Some(seed_entry) = &config.seed_entry {
            let slot_id = find_seed_slot(&slots, seed_entry)?;
            searcher.preassign(slot_id, &seed_entry.word)?;
        }

        let outcome = searcher.run()?;
        statistics.states += searcher.states();
        statistics.backtracks += searcher.backtracks();

        if outcome == Outcome::Solved {
            statistics.attempts = attempt + 1;
            statistics.duration = start.elapsed();

            let numbering = number_cells(&grid);
            let entries = extract_entries(&grid, &slots, &numbering)?;
            return Ok(FilledPuzzle {
                grid,
                slots,
                entries,
                numbering,
                statistics,
            });
        }
    }

    Err(GenerationError::Unsolvable {
        attempts,
        backtracks: statistics.backtracks,
    })
}

/// Every slot length occurring in the layout needs a minimum stock of words
/// before a search is worth starting: at least max(2N, 10) per length.
fn check_dictionary_sufficiency(
    dictionary: &DictionaryIndex,
    size: usize,
    slots: &[Slot],
) -> Result<(), GenerationError> {
    let required = (2 * size).max(10);
    let mut lengths: Vec<usize> = slots.iter().map(|slot| slot.length).collect();
    lengths.sort_unstable();
    lengths.dedup();

    for length in lengths {
        let available = dictionary.word_count(length);
        if available < required {
            return Err(GenerationError::InsufficientDictionary {
                length,
                available,
                required,
            });
        }
    }
    Ok(())
}

/// Resolve a seed entry to the slot it names. The word must be lowercase
/// alphabetic and exactly fill that slot.
fn find_seed_slot(slots: &[Slot], seed: &SeedEntry) -> Result<SlotId, GenerationError> {
    let slot = slots
        .iter()
        .find(|slot| {
            slot.direction == seed.direction && slot.row == seed.row && slot.col == seed.col
        })
        .ok_or(GenerationError::Invariant {
            row: seed.row,
            col: seed.col,
            detail: "seed entry names no slot",
        })?;

    if seed.word.chars().count() != slot.length {
        return Err(GenerationError::Invariant {
            row: seed.row,
            col: seed.col,
            detail: "seed word length does not match its slot",
        });
    }
    if !seed.word.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(GenerationError::Invariant {
            row: seed.row,
            col: seed.col,
            detail: "seed word must be lowercase alphabetic",
        });
    }
    Ok(slot.id)
}
