//! Crossing-feasibility pruning: the one-step look-ahead applied to every
//! candidate word before the search commits it.
//!
//! A crossing shares exactly one cell with the slot being filled, so instead
//! of placing the candidate on a scratch grid we compute each crossing's
//! pattern with the candidate's letter substituted at the shared cell. Any
//! placement that passes leaves every crossing at least nominally fillable;
//! conflicts more than one slot away are the backtracking search's problem.

use std::collections::HashSet;

use bit_set::BitSet;
use smallvec::SmallVec;

use crate::dictionary::{completed_word, DictionaryIndex, PatternAtom};
use crate::grid::{Grid, Slot, SlotCrossings};
use crate::MAX_SLOT_LENGTH;

/// Decide whether writing `word` into `slot` keeps every crossing slot
/// satisfiable.
///
/// Crossings whose slots are already assigned are skipped: their word was
/// validated when it was chosen and the candidate cannot change it (the
/// candidate is pattern-compatible with the slot, so shared cells agree).
/// For each remaining crossing, if the substituted pattern is fully fixed
/// the completed string must be a dictionary word distinct from both the
/// candidate and every word already used; otherwise at least one dictionary
/// completion must exist.
pub fn placement_is_feasible(
    grid: &Grid,
    dictionary: &DictionaryIndex,
    slots: &[Slot],
    crossings: &[SlotCrossings],
    assigned: &BitSet,
    used: &HashSet<String>,
    slot: &Slot,
    word: &str,
) -> bool {
    let letters: SmallVec<[char; MAX_SLOT_LENGTH]> = word.chars().collect();

    for (idx, crossing) in crossings[slot.id].iter().enumerate() {
        let crossing = match crossing {
            Some(crossing) => crossing,
            None => continue,
        };
        if assigned.contains(crossing.other_slot_id) {
            continue;
        }

        let other = &slots[crossing.other_slot_id];
        let mut pattern = grid.pattern_of(other);
        pattern[crossing.other_slot_cell] = PatternAtom::Fixed(letters[idx]);

        if let Some(completed) = completed_word(&pattern) {
            if completed == word || used.contains(&completed) || !dictionary.contains(&completed) {
                return false;
            }
        } else if !dictionary.has_matching(other.length, &pattern) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::compute_crossings;

    fn harness() -> (Grid, Vec<Slot>, Vec<SlotCrossings>, DictionaryIndex) {
        let grid = Grid::empty(3);
        let slots = grid.slots();
        let crossings = compute_crossings(&slots);
        let dictionary =
            DictionaryIndex::build(["cat", "cow", "arc", "tab", "act", "oat", "bat"]);
        (grid, slots, crossings, dictionary)
    }

    #[test]
    fn test_candidate_with_live_crossings_is_endorsed() {
        let (grid, slots, crossings, dictionary) = harness();
        // "cat" across the top row: columns need completions of c??, a??, t??.
        assert!(placement_is_feasible(
            &grid,
            &dictionary,
            &slots,
            &crossings,
            &BitSet::new(),
            &HashSet::new(),
            &slots[0],
            "cat",
        ));
    }

    #[test]
    fn test_candidate_killing_a_crossing_is_rejected() {
        let (grid, slots, crossings, dictionary) = harness();
        // "cow" across the top row: no word starts with w, so column 2 dies.
        assert!(!placement_is_feasible(
            &grid,
            &dictionary,
            &slots,
            &crossings,
            &BitSet::new(),
            &HashSet::new(),
            &slots[0],
            "cow",
        ));
    }

    #[test]
    fn test_completed_crossing_must_be_a_word() {
        let (mut grid, slots, crossings, dictionary) = harness();
        // Fix column 0 to "a?c" via the other across slots, then try to
        // complete it with a letter that spells a non-word.
        grid.place(&slots[0], "act").expect("place act");
        grid.place(&slots[2], "cat").expect("place cat");

        let mut assigned = BitSet::new();
        assigned.insert(0);
        assigned.insert(2);
        let mut used = HashSet::new();
        used.insert("act".to_string());
        used.insert("cat".to_string());

        // Middle row "o??" would complete column 0 to "aoc", not a word.
        assert!(!placement_is_feasible(
            &grid,
            &dictionary,
            &slots,
            &crossings,
            &assigned,
            &used,
            &slots[1],
            "oat",
        ));
    }

    #[test]
    fn test_completed_crossing_duplicating_used_word_is_rejected() {
        let (mut grid, slots, crossings, dictionary) = harness();
        grid.place(&slots[0], "cat").expect("place cat");
        grid.place(&slots[2], "tab").expect("place tab");

        let mut assigned = BitSet::new();
        assigned.insert(0);
        assigned.insert(2);
        let mut used = HashSet::new();
        used.insert("cat".to_string());
        used.insert("tab".to_string());

        // Column 0 reads c?t; a middle-row word starting with 'a' would
        // complete it to "cat", which is already used.
        assert!(!placement_is_feasible(
            &grid,
            &dictionary,
            &slots,
            &crossings,
            &assigned,
            &used,
            &slots[1],
            "act",
        ));
    }
}
