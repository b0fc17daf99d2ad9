//! Execution error types
//!
//! Every failure the language engine can detect, during either expression
//! parsing or instruction execution. All of them are fatal: the scheduler
//! stops, the cursor is forced to end-of-program, and the device signals
//! the kind with a blink count on the indicator. There is no structured
//! error channel back to the host.

use std::fmt;

/// Errors detected while parsing or executing program text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// An assignment with none of the `++`, `--`, `=` forms, or a
    /// parenthesized expression missing its `)`.
    Syntax,

    /// The instruction's leading character is not one the machine knows.
    Instruction,

    /// An expression operand starts with an unrecognized character, or a
    /// division has a zero divisor.
    Operand,

    /// The eleventh distinct variable name.
    TooManyVariables,

    /// A `$name` operand naming a variable with no binding.
    VariableNotFound { name: String },

    /// A `^name` branch with no matching `#name` marker.
    LabelNotFound { name: String },
}

impl ExecError {
    /// How many times the indicator blinks for this error.
    pub fn blinks(&self) -> u8 {
        match self {
            ExecError::Syntax => 1,
            ExecError::Instruction => 2,
            ExecError::Operand => 3,
            ExecError::TooManyVariables => 4,
            ExecError::VariableNotFound { .. } => 5,
            ExecError::LabelNotFound { .. } => 6,
        }
    }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Syntax => write!(f, "syntax error"),
            ExecError::Instruction => write!(f, "unknown instruction"),
            ExecError::Operand => write!(f, "bad operand"),
            ExecError::TooManyVariables => write!(f, "too many variables"),
            ExecError::VariableNotFound { name } => {
                write!(f, "variable '{}' not found", name)
            }
            ExecError::LabelNotFound { name } => {
                write!(f, "label '{}' not found", name)
            }
        }
    }
}

impl std::error::Error for ExecError {}
