//! The heuristic backtracking search that fills a grid one slot at a time.
//!
//! Slot selection is MRV-style: the slot with the fewest open letters wins,
//! then the one with the fewest remaining candidates, then the lowest id.
//! Candidates are ordered by letter informativeness (or shuffled, when random
//! exploration is requested), pruned by the crossing-feasibility check, and
//! placed with an exact snapshot so backtracking restores the grid
//! bit-for-bit. A monotone backtrack counter bounds each attempt.

use std::cmp::Reverse;
use std::collections::HashSet;

use bit_set::BitSet;
use instant::Duration;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::dictionary::{wildcard_count, DictionaryIndex, Pattern, PatternAtom};
use crate::error::GenerationError;
use crate::feasibility::placement_is_feasible;
use crate::grid::{Grid, Slot, SlotCrossings, SlotId};

/// Relative frequency of each letter in English text, scaled to parts per
/// ten thousand. A candidate scores the sum of these weights over the
/// positions it fills that were previously wildcards, so words that drop
/// common letters into open crossings are tried first.
const LETTER_FREQUENCY: [u32; 26] = [
    817, 149, 278, 425, 1270, 223, 202, 609, 697, 15, 77, 403, 241, 675, 751, 193, 10, 599, 633,
    906, 276, 98, 236, 15, 197, 7,
];

/// Per-attempt limits for the backtracking search.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Cumulative backtracks allowed before the attempt aborts.
    pub max_backtracks: usize,
    /// Cap on how many candidates are tried per slot visit.
    pub candidate_cap: usize,
}

impl Default for SearchLimits {
    fn default() -> SearchLimits {
        SearchLimits {
            max_backtracks: 10_000,
            candidate_cap: 150,
        }
    }
}

/// Candidate ordering policy for each slot visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrdering {
    /// Highest letter-informativeness first (deterministic).
    Heuristic,
    /// Seeded shuffle.
    Random,
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Slot visits across all attempts.
    pub states: u64,
    /// Placements undone across all attempts.
    pub backtracks: u64,
    /// Attempts consumed, including the successful one.
    pub attempts: usize,
    pub duration: Duration,
}

/// Outcome of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Solved,
    /// Every candidate ordering was exhausted without filling the grid.
    Exhausted,
    /// The backtrack budget ran out mid-search.
    OutOfBudget,
}

enum Step {
    Solved,
    Failed,
}

/// The mutable state of one fill attempt. The dictionary, slot list, and
/// crossing table are shared read-only; the grid, assignment, and used-word
/// set are owned by this attempt and discarded with it.
pub struct Searcher<'a> {
    dictionary: &'a DictionaryIndex,
    slots: &'a [Slot],
    crossings: &'a [SlotCrossings],
    grid: &'a mut Grid,
    rng: &'a mut SmallRng,
    ordering: CandidateOrdering,
    limits: SearchLimits,
    assignment: Vec<Option<String>>,
    assigned: BitSet,
    used: HashSet<String>,
    states: u64,
    backtracks: u64,
    out_of_budget: bool,
}

impl<'a> Searcher<'a> {
    pub fn new(
        dictionary: &'a DictionaryIndex,
        slots: &'a [Slot],
        crossings: &'a [SlotCrossings],
        grid: &'a mut Grid,
        rng: &'a mut SmallRng,
        ordering: CandidateOrdering,
        limits: SearchLimits,
    ) -> Searcher<'a> {
        Searcher {
            dictionary,
            slots,
            crossings,
            grid,
            rng,
            ordering,
            limits,
            assignment: vec![None; slots.len()],
            assigned: BitSet::with_capacity(slots.len()),
            used: HashSet::new(),
            states: 0,
            backtracks: 0,
            out_of_budget: false,
        }
    }

    /// Pre-place a word and treat its slot as assigned from the first
    /// recursion onward. The word joins the used set immediately.
    pub fn preassign(&mut self, slot_id: SlotId, word: &str) -> Result<(), GenerationError> {
        let slot = &self.slots[slot_id];
        self.grid.place(slot, word)?;
        self.assigned.insert(slot_id);
        self.used.insert(word.to_string());
        self.assignment[slot_id] = Some(word.to_string());
        Ok(())
    }

    /// Run the attempt to completion. `Err` is reserved for internal
    /// invariant violations; failing to find a fill is an `Ok` outcome.
    pub fn run(&mut self) -> Result<Outcome, GenerationError> {
        match self.fill_next()? {
            Step::Solved => Ok(Outcome::Solved),
            Step::Failed if self.out_of_budget => Ok(Outcome::OutOfBudget),
            Step::Failed => Ok(Outcome::Exhausted),
        }
    }

    /// The slot-to-word mapping as it currently stands; fully populated once
    /// `run` reports Solved.
    pub fn assignment(&self) -> &[Option<String>] {
        &self.assignment
    }

    pub fn states(&self) -> u64 {
        self.states
    }

    pub fn backtracks(&self) -> u64 {
        self.backtracks
    }

    /// Most-constrained-first slot selection: fewest wildcards in the current
    /// pattern, then fewest matching candidates, then canonical slot order.
    fn select_slot(&self) -> Option<SlotId> {
        let mut best: Option<(usize, usize, SlotId)> = None;
        for slot in self.slots {
            if self.assigned.contains(slot.id) {
                continue;
            }
            let pattern = self.grid.pattern_of(slot);
            let open = wildcard_count(&pattern);
            let candidates = self.dictionary.count_matching(slot.length, &pattern);
            let key = (open, candidates, slot.id);
            if best.map_or(true, |current| key < current) {
                best = Some(key);
            }
        }
        best.map(|(_, _, slot_id)| slot_id)
    }

    /// Matching words minus the used set, ordered per policy and truncated
    /// to the candidate cap.
    fn candidates_for(&mut self, slot: &Slot, pattern: &Pattern) -> Vec<String> {
        let mut words: Vec<String> = self
            .dictionary
            .matching(slot.length, pattern)
            .filter(|word| !self.used.contains(word))
            .collect();

        match self.ordering {
            CandidateOrdering::Heuristic => {
                // Stable sort: ties keep the lexicographic order `matching`
                // produced, so the ordering is fully deterministic.
                words.sort_by_key(|word| Reverse(informativeness(word, pattern)));
            }
            CandidateOrdering::Random => {
                words.shuffle(self.rng);
            }
        }

        words.truncate(self.limits.candidate_cap);
        words
    }

    fn fill_next(&mut self) -> Result<Step, GenerationError> {
        let slot_id = match self.select_slot() {
            Some(slot_id) => slot_id,
            None => return Ok(Step::Solved),
        };
        self.states += 1;

        let slots = self.slots;
        let slot = &slots[slot_id];
        let pattern = self.grid.pattern_of(slot);

        for word in self.candidates_for(slot, &pattern) {
            if !placement_is_feasible(
                self.grid,
                self.dictionary,
                self.slots,
                self.crossings,
                &self.assigned,
                &self.used,
                slot,
                &word,
            ) {
                continue;
            }

            let before = self.grid.snapshot_of(slot);
            self.grid.place(slot, &word)?;
            self.assigned.insert(slot_id);
            self.used.insert(word.clone());
            self.assignment[slot_id] = Some(word.clone());

            match self.fill_next()? {
                Step::Solved => return Ok(Step::Solved),
                Step::Failed => {
                    self.grid.unplace(slot, &before);
                    self.assigned.remove(slot_id);
                    self.used.remove(&word);
                    self.assignment[slot_id] = None;

                    self.backtracks += 1;
                    if self.out_of_budget {
                        return Ok(Step::Failed);
                    }
                    if self.backtracks > self.limits.max_backtracks as u64 {
                        self.out_of_budget = true;
                        return Ok(Step::Failed);
                    }
                }
            }
        }

        Ok(Step::Failed)
    }
}

/// Sum of letter-frequency weights over the positions a candidate would
/// newly fix (those that are wildcards in the slot's current pattern).
fn informativeness(word: &str, pattern: &Pattern) -> u32 {
    word.chars()
        .zip(pattern.iter())
        .map(|(c, atom)| match atom {
            PatternAtom::Wildcard => LETTER_FREQUENCY[(c as u8 - b'a') as usize],
            PatternAtom::Fixed(_) => 0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::parse_pattern;
    use crate::grid::compute_crossings;
    use rand::SeedableRng;

    fn run_search(
        dictionary: &DictionaryIndex,
        grid: &mut Grid,
        ordering: CandidateOrdering,
        limits: SearchLimits,
    ) -> Outcome {
        let slots = grid.slots();
        let crossings = compute_crossings(&slots);
        let mut rng = SmallRng::seed_from_u64(7);
        let mut searcher = Searcher::new(
            dictionary,
            &slots,
            &crossings,
            grid,
            &mut rng,
            ordering,
            limits,
        );
        searcher.run().expect("search must not hit invariants")
    }

    #[test]
    fn test_informativeness_scores_only_wildcards() {
        let pattern = parse_pattern("c??");
        // 'c' is fixed and contributes nothing; 'a' and 't' count.
        assert_eq!(
            informativeness("cat", &pattern),
            LETTER_FREQUENCY[0] + LETTER_FREQUENCY[19]
        );
    }

    #[test]
    fn test_solves_a_3x3_double_square() {
        // bit/ace/yen rows with bay/ice/ten columns is one known solution.
        let dictionary = DictionaryIndex::build([
            "bit", "ace", "yen", "bay", "ice", "ten", "cat", "dog", "map", "arc",
        ]);
        let mut grid = Grid::empty(3);
        let outcome = run_search(
            &dictionary,
            &mut grid,
            CandidateOrdering::Heuristic,
            SearchLimits::default(),
        );
        assert_eq!(outcome, Outcome::Solved);

        let slots = grid.slots();
        let mut seen = HashSet::new();
        for slot in &slots {
            let word = crate::dictionary::completed_word(&grid.pattern_of(slot))
                .expect("every slot must be fully lettered");
            assert!(dictionary.contains(&word), "{word} not in dictionary");
            assert!(seen.insert(word.clone()), "{word} used twice");
        }
    }

    #[test]
    fn test_unsolvable_dictionary_is_reported() {
        // No column can ever be completed: the only words sharing a first
        // letter are too few to stack four distinct rows.
        let dictionary = DictionaryIndex::build([
            "abcd", "efgh", "ijkl", "mnop", "qrst", "uvwx", "aaaa", "eeee", "iiii", "oooo",
        ]);
        let mut grid = Grid::empty(4);
        let outcome = run_search(
            &dictionary,
            &mut grid,
            CandidateOrdering::Heuristic,
            SearchLimits::default(),
        );
        assert_eq!(outcome, Outcome::Exhausted);
    }

    #[test]
    fn test_backtrack_budget_aborts_search() {
        let dictionary = DictionaryIndex::build([
            "abcd", "efgh", "ijkl", "mnop", "qrst", "uvwx", "aaaa", "eeee", "iiii", "oooo",
        ]);
        let mut grid = Grid::empty(4);
        let outcome = run_search(
            &dictionary,
            &mut grid,
            CandidateOrdering::Heuristic,
            SearchLimits {
                max_backtracks: 0,
                candidate_cap: 150,
            },
        );
        // With a zero budget the first backtrack aborts the attempt.
        assert_eq!(outcome, Outcome::OutOfBudget);
    }

    #[test]
    fn test_preassigned_slot_survives_search() {
        let dictionary = DictionaryIndex::build([
            "bit", "ace", "yen", "bay", "ice", "ten", "cat", "dog", "map", "arc",
        ]);
        let mut grid = Grid::empty(3);
        let slots = grid.slots();
        let crossings = compute_crossings(&slots);
        let mut rng = SmallRng::seed_from_u64(7);
        let mut searcher = Searcher::new(
            &dictionary,
            &slots,
            &crossings,
            &mut grid,
            &mut rng,
            CandidateOrdering::Heuristic,
            SearchLimits::default(),
        );
        searcher.preassign(0, "bit").expect("preassign bit");
        assert_eq!(searcher.run().expect("run"), Outcome::Solved);
        assert_eq!(searcher.assignment()[0].as_deref(), Some("bit"));
        assert!(searcher.assignment().iter().all(Option::is_some));
        assert_eq!(grid.pattern_of(&slots[0]), parse_pattern("bit"));
    }
}
