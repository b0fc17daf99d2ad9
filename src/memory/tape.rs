//! The tape: a fixed row of color cells plus the head position
//!
//! The tape has exactly [`NUM_CELLS`] cells. The head index ranges over
//! `[-1, NUM_CELLS]` inclusive: the two extremes are off-tape sentinel
//! positions with one cell of overrun margin on each side. Reads from an
//! off-tape position are black, writes there are dropped, and any movement
//! past an extreme clamps back to it.

use super::symbol::Symbol;

/// Number of cells on the tape.
pub const NUM_CELLS: usize = 27;

/// The tape and its head.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: [Symbol; NUM_CELLS],
    head: i8,
}

impl Tape {
    pub fn new() -> Self {
        Tape {
            cells: [Symbol::Black; NUM_CELLS],
            head: 0,
        }
    }

    /// Clear every cell to black and return the head to the first cell.
    pub fn reset(&mut self) {
        self.cells = [Symbol::Black; NUM_CELLS];
        self.head = 0;
    }

    /// Current head position, in `[-1, NUM_CELLS]`.
    pub fn head(&self) -> i8 {
        self.head
    }

    /// True if the head sits on one of the off-tape sentinel positions.
    pub fn is_off_tape(&self) -> bool {
        self.head < 0 || self.head >= NUM_CELLS as i8
    }

    /// The symbol at a cell index.
    pub fn cell(&self, index: usize) -> Symbol {
        self.cells[index]
    }

    /// All cells, leftmost first.
    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    /// The symbol under the head. Off-tape positions read as black.
    pub fn under_head(&self) -> Symbol {
        if self.is_off_tape() {
            Symbol::Black
        } else {
            self.cells[self.head as usize]
        }
    }

    /// Write a symbol at the head. Off-tape positions can't be written.
    pub fn write(&mut self, symbol: Symbol) {
        if !self.is_off_tape() {
            self.cells[self.head as usize] = symbol;
        }
    }

    /// Move the head by a signed offset, clamping to the off-tape margins.
    pub fn move_by(&mut self, delta: i16) {
        let target = i16::from(self.head) + delta;
        self.head = target.clamp(-1, NUM_CELLS as i16) as i8;
    }

    /// Jump to the first cell.
    pub fn move_to_first(&mut self) {
        self.head = 0;
    }

    /// Jump to the last cell.
    pub fn move_to_last(&mut self) {
        self.head = NUM_CELLS as i8 - 1;
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}
