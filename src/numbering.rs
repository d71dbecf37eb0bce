//! Clue numbering and across/down entry extraction for a completed grid.
//!
//! Numbering is a pure function of the block layout: scanning row-major, a
//! cell receives the next number (from 1) iff at least one slot starts there.

use crate::error::GenerationError;
use crate::grid::{Cell, Direction, Grid, Slot};
use crate::MIN_SLOT_LENGTH;

/// One across or down answer in the finished puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub number: u16,
    pub length: usize,
    /// (row, col) of the first cell.
    pub start: (usize, usize),
    pub word: String,
}

/// The across and down entry lists, each sorted by number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entries {
    pub across: Vec<Entry>,
    pub down: Vec<Entry>,
}

/// Assign clue numbers per standard rules: scanning cells row-major, a cell
/// is numbered iff it begins an across run (no open cell to its left, run of
/// length >= 3 to the right) or the vertical equivalent.
pub fn number_cells(grid: &Grid) -> Vec<Vec<Option<u16>>> {
    let size = grid.size();
    let mut numbering = vec![vec![None; size]; size];
    let mut next = 1u16;

    for row in 0..size {
        for col in 0..size {
            if grid.is_block(row, col) {
                continue;
            }
            let starts_across = (col == 0 || grid.is_block(row, col - 1))
                && run_length_across(grid, row, col) >= MIN_SLOT_LENGTH;
            let starts_down = (row == 0 || grid.is_block(row - 1, col))
                && run_length_down(grid, row, col) >= MIN_SLOT_LENGTH;
            if starts_across || starts_down {
                numbering[row][col] = Some(next);
                next += 1;
            }
        }
    }

    numbering
}

fn run_length_across(grid: &Grid, row: usize, col: usize) -> usize {
    (col..grid.size())
        .take_while(|&c| !grid.is_block(row, c))
        .count()
}

fn run_length_down(grid: &Grid, row: usize, col: usize) -> usize {
    (row..grid.size())
        .take_while(|&r| !grid.is_block(r, col))
        .count()
}

/// Read every slot's word out of a completed grid and pair it with its clue
/// number. An Empty cell or an unnumbered slot start means the grid was not
/// actually complete, which is an engine bug.
pub fn extract_entries(
    grid: &Grid,
    slots: &[Slot],
    numbering: &[Vec<Option<u16>>],
) -> Result<Entries, GenerationError> {
    let mut across = Vec::new();
    let mut down = Vec::new();

    for slot in slots {
        let mut word = String::with_capacity(slot.length);
        for (row, col) in slot.cells() {
            match grid.cell(row, col) {
                Cell::Letter(c) => word.push(c),
                _ => {
                    return Err(GenerationError::Invariant {
                        row,
                        col,
                        detail: "unfilled cell in a completed grid",
                    });
                }
            }
        }

        let number = match numbering[slot.row][slot.col] {
            Some(number) => number,
            None => {
                return Err(GenerationError::Invariant {
                    row: slot.row,
                    col: slot.col,
                    detail: "slot start carries no clue number",
                });
            }
        };

        let entry = Entry {
            number,
            length: slot.length,
            start: (slot.row, slot.col),
            word,
        };
        match slot.direction {
            Direction::Across => across.push(entry),
            Direction::Down => down.push(entry),
        }
    }

    across.sort_by_key(|entry| entry.number);
    down.sort_by_key(|entry| entry.number);
    Ok(Entries { across, down })
}
