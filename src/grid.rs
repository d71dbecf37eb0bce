//! The board model: an N×N array of cells, slot enumeration derived from the
//! block layout, and exactly-undoable word placement.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fmt;

use smallvec::SmallVec;

use crate::dictionary::{Pattern, PatternAtom};
use crate::error::GenerationError;
use crate::{MAX_SLOT_LENGTH, MIN_SLOT_LENGTH};

/// An identifier for a slot, based on its index in the canonical slot order.
pub type SlotId = usize;

/// The block cells of a layout, addressed as (row, col). A BTreeSet keeps
/// iteration order deterministic.
pub type BlockSet = BTreeSet<(usize, usize)>;

/// One cell of the board. Block cells are opaque walls; open cells are Empty
/// until the search writes a letter into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Block,
    Letter(char),
}

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Across,
    Down,
}

/// A maximal run of open cells of length >= 3, the atomic unit of word
/// placement. Identified by direction, start coordinate, and length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub id: SlotId,
    pub direction: Direction,
    pub row: usize,
    pub col: usize,
    pub length: usize,
}

impl Slot {
    /// Coordinate of the idx-th cell of this slot.
    pub fn cell(&self, idx: usize) -> (usize, usize) {
        match self.direction {
            Direction::Across => (self.row, self.col + idx),
            Direction::Down => (self.row + idx, self.col),
        }
    }

    /// Coordinates of every cell of this slot, in order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.length).map(move |idx| self.cell(idx))
    }
}

/// A crossing between one slot and the perpendicular slot sharing a cell,
/// referencing the other slot's id and the shared cell's index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub other_slot_cell: usize,
}

/// Per-cell crossing table for one slot; None where the cell lies in no
/// perpendicular slot.
pub type SlotCrossings = SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>;

/// Prior cell contents captured before a `place`, consumed by `unplace`.
pub type SlotSnapshot = SmallVec<[Cell; MAX_SLOT_LENGTH]>;

/// A square board of cells, row-major. The block layout is fixed at
/// construction; only letters change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// An all-open grid with every cell Empty.
    pub fn empty(size: usize) -> Grid {
        Grid {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// An open grid with the given cells marked Block.
    pub fn with_blocks(size: usize, blocks: &BlockSet) -> Grid {
        let mut grid = Grid::empty(size);
        for &(row, col) in blocks {
            assert!(
                row < size && col < size,
                "block ({row}, {col}) outside {size}x{size} grid"
            );
            grid.cells[row * size + col] = Cell::Block;
        }
        grid
    }

    /// Parse a grid from a template string: `#` is a block, `.` an empty
    /// cell, and a lowercase letter itself. Blank lines and surrounding
    /// whitespace are ignored. The template must be square.
    pub fn from_template(template: &str) -> Grid {
        let rows: Vec<&str> = template
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in &rows {
            assert_eq!(
                row.chars().count(),
                size,
                "template must be square, row {row:?} has the wrong width"
            );
            for c in row.chars() {
                cells.push(match c {
                    '#' => Cell::Block,
                    '.' => Cell::Empty,
                    c if c.is_ascii_lowercase() => Cell::Letter(c),
                    c => panic!("unexpected template char {c:?}"),
                });
            }
        }
        Grid { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size + col]
    }

    pub fn is_block(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) == Cell::Block
    }

    /// Enumerate the slots implied by the block layout, independent of letter
    /// contents: Across slots ordered by (start_row, start_col), then Down
    /// slots ordered by (start_col, start_row). Ids are indexes into the
    /// returned order. Runs shorter than 3 are not admitted.
    pub fn slots(&self) -> Vec<Slot> {
        let mut slots = Vec::new();

        for row in 0..self.size {
            let mut start = 0;
            for col in 0..=self.size {
                if col == self.size || self.is_block(row, col) {
                    let length = col - start;
                    if length >= MIN_SLOT_LENGTH {
                        slots.push(Slot {
                            id: slots.len(),
                            direction: Direction::Across,
                            row,
                            col: start,
                            length,
                        });
                    }
                    start = col + 1;
                }
            }
        }

        for col in 0..self.size {
            let mut start = 0;
            for row in 0..=self.size {
                if row == self.size || self.is_block(row, col) {
                    let length = row - start;
                    if length >= MIN_SLOT_LENGTH {
                        slots.push(Slot {
                            id: slots.len(),
                            direction: Direction::Down,
                            row: start,
                            col,
                            length,
                        });
                    }
                    start = row + 1;
                }
            }
        }

        slots
    }

    /// The pattern the slot currently imposes on candidate words: Fixed
    /// wherever a letter is already present, Wildcard where the cell is
    /// still Empty.
    pub fn pattern_of(&self, slot: &Slot) -> Pattern {
        slot.cells()
            .map(|(row, col)| match self.cell(row, col) {
                Cell::Letter(c) => PatternAtom::Fixed(c),
                Cell::Empty => PatternAtom::Wildcard,
                Cell::Block => panic!("block cell ({row}, {col}) inside slot {}", slot.id),
            })
            .collect()
    }

    /// Capture the slot's current cells so a later `unplace` can restore
    /// them exactly.
    pub fn snapshot_of(&self, slot: &Slot) -> SlotSnapshot {
        slot.cells().map(|(row, col)| self.cell(row, col)).collect()
    }

    /// Write the word's letters into the slot. Every affected cell must be
    /// Empty or already hold the same letter; the write happens only after
    /// the whole slot validates, so a failed place leaves the grid untouched.
    pub fn place(&mut self, slot: &Slot, word: &str) -> Result<(), GenerationError> {
        let letters: SmallVec<[char; MAX_SLOT_LENGTH]> = word.chars().collect();
        if letters.len() != slot.length {
            return Err(GenerationError::Invariant {
                row: slot.row,
                col: slot.col,
                detail: "word length does not match slot length",
            });
        }

        for (idx, &letter) in letters.iter().enumerate() {
            let (row, col) = slot.cell(idx);
            match self.cell(row, col) {
                Cell::Empty => {}
                Cell::Letter(existing) if existing == letter => {}
                Cell::Letter(_) => {
                    return Err(GenerationError::Invariant {
                        row,
                        col,
                        detail: "conflicting letter already placed",
                    });
                }
                Cell::Block => {
                    return Err(GenerationError::Invariant {
                        row,
                        col,
                        detail: "cannot place a letter on a block",
                    });
                }
            }
        }

        for (idx, &letter) in letters.iter().enumerate() {
            let (row, col) = slot.cell(idx);
            self.cells[row * self.size + col] = Cell::Letter(letter);
        }
        Ok(())
    }

    /// Restore the slot's cells to a previously captured snapshot, exactly
    /// undoing the paired `place`.
    pub fn unplace(&mut self, slot: &Slot, before: &SlotSnapshot) {
        for (idx, &cell) in before.iter().enumerate() {
            let (row, col) = slot.cell(idx);
            self.cells[row * self.size + col] = cell;
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                let c = match self.cell(row, col) {
                    Cell::Block => '#',
                    Cell::Empty => '.',
                    Cell::Letter(c) => c,
                };
                write!(f, "{c}")?;
            }
            if row + 1 < self.size {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Build the per-slot crossing tables by mapping each cell to the slots
/// passing through it. Every cell belongs to at most one slot per direction,
/// so each cell of a slot crosses at most one other slot.
pub fn compute_crossings(slots: &[Slot]) -> Vec<SlotCrossings> {
    let mut slots_by_cell: HashMap<(usize, usize), SmallVec<[(SlotId, usize); 2]>> = HashMap::new();
    for slot in slots {
        for (idx, coord) in slot.cells().enumerate() {
            slots_by_cell.entry(coord).or_default().push((slot.id, idx));
        }
    }

    slots
        .iter()
        .map(|slot| {
            slot.cells()
                .map(|coord| {
                    slots_by_cell[&coord]
                        .iter()
                        .find(|&&(other_id, _)| other_id != slot.id)
                        .map(|&(other_slot_id, other_slot_cell)| Crossing {
                            other_slot_id,
                            other_slot_cell,
                        })
                })
                .collect()
        })
        .collect()
}
