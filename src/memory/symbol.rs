//! Tape cell symbols
//!
//! A tape cell holds one of eight color symbols, written in programs as a
//! single upper-case letter. [`Symbol::Black`] doubles as the "off" state:
//! a freshly reset tape is all black, and off-tape reads are black too.

use std::fmt;

/// The eight color symbols a tape cell can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Symbol {
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    Yellow,
    White,
    #[default]
    Black,
}

impl Symbol {
    /// Parse a symbol letter. Returns `None` for anything that is not one of
    /// the eight instruction letters.
    pub fn from_char(c: u8) -> Option<Symbol> {
        match c {
            b'R' => Some(Symbol::Red),
            b'G' => Some(Symbol::Green),
            b'B' => Some(Symbol::Blue),
            b'C' => Some(Symbol::Cyan),
            b'M' => Some(Symbol::Magenta),
            b'Y' => Some(Symbol::Yellow),
            b'W' => Some(Symbol::White),
            b'K' => Some(Symbol::Black),
            _ => None,
        }
    }

    /// The instruction letter for this symbol.
    pub fn as_char(self) -> char {
        match self {
            Symbol::Red => 'R',
            Symbol::Green => 'G',
            Symbol::Blue => 'B',
            Symbol::Cyan => 'C',
            Symbol::Magenta => 'M',
            Symbol::Yellow => 'Y',
            Symbol::White => 'W',
            Symbol::Black => 'K',
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
