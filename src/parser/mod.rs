//! Program text parsing
//!
//! The instruction language is line-oriented and small enough to parse and
//! evaluate in a single pass, with no token stream or syntax tree:
//! - [`cursor`]: read position over the program buffer, with the shared
//!   token helpers (whitespace/comment skipping, names, numbers)
//! - [`chars`]: character classes of the language
//! - [`expr`]: one-pass recursive-descent expression evaluator
//!
//! # Grammar
//!
//! ```text
//! expr    := '(' expr ')' | operand (op operand)*
//! operand := symbol-test | '$' name | ['-'] digits
//! ```
//!
//! Operators have no precedence levels; chains evaluate strictly left to
//! right. This is deliberate language behavior, not a simplification.

pub mod chars;
pub mod cursor;
pub mod expr;

pub use cursor::Cursor;
