//! Expression evaluator
//!
//! Expressions are parsed and evaluated in one pass by recursive descent:
//!
//! ```text
//! expr    := '(' expr ')' | operand (op operand)*
//! operand := symbol-test | '$' name | ['-'] digits
//! op      := '+' | '-' | '*' | '/' | '&' | '|'
//! ```
//!
//! Operator chains are strictly left-to-right with no precedence levels:
//! `2+3*4` is 20, not 14. A parenthesized group is only recognized where a
//! full expression starts, never as a chain operand, so `2+(3*4)` is an
//! operand error while `(2+3)*4` is fine.
//!
//! Chains accumulate in 16-bit wrapping arithmetic, but the value of every
//! parenthesized group and of the completed expression is re-truncated to
//! signed 8 bits, matching the device's registers: `(100+100)` is -56.

use super::chars;
use super::cursor::Cursor;
use crate::engine::errors::ExecError;
use crate::memory::{Symbol, Tape, VariableTable};

/// Parse and evaluate one expression at the cursor. The result is the
/// sign-extended 8-bit value.
pub fn expression(
    cur: &mut Cursor,
    tape: &Tape,
    vars: &VariableTable,
) -> Result<i16, ExecError> {
    cur.skip_space();

    let mut result = if cur.current() == b'(' {
        cur.step();
        let inner = expression(cur, tape, vars)?;
        if cur.current() != b')' {
            return Err(ExecError::Syntax);
        }
        cur.step();
        inner
    } else {
        operand(cur, tape, vars)?
    };

    loop {
        cur.skip_space();

        if cur.current() == b')' {
            break;
        }

        let op = cur.current();
        if !chars::is_operator(op) {
            break;
        }
        cur.step();

        let rhs = operand(cur, tape, vars)?;

        result = match op {
            b'+' => result.wrapping_add(rhs),
            b'-' => result.wrapping_sub(rhs),
            b'*' => result.wrapping_mul(rhs),
            b'/' => {
                if rhs == 0 {
                    return Err(ExecError::Operand);
                }
                result.wrapping_div(rhs)
            }
            b'&' => result & rhs,
            _ => result | rhs,
        };
    }

    // back to the machine's 8-bit registers
    Ok(i16::from(result as i8))
}

/// Parse and evaluate one operand: a symbol test against the cell under
/// the head (off-tape reads as black), a variable lookup, or a decimal
/// literal.
fn operand(cur: &mut Cursor, tape: &Tape, vars: &VariableTable) -> Result<i16, ExecError> {
    cur.skip_space();

    let c = cur.current();

    if let Some(symbol) = Symbol::from_char(c) {
        cur.step();
        return Ok(i16::from(tape.under_head() == symbol));
    }

    if c == b'$' {
        cur.step();
        let name = cur.name();
        return match vars.lookup(&name) {
            Some(value) => Ok(i16::from(value)),
            None => Err(ExecError::VariableNotFound {
                name: name.to_string(),
            }),
        };
    }

    if c == b'-' || c.is_ascii_digit() {
        return Ok(i16::from(cur.number()));
    }

    Err(ExecError::Operand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Name;

    fn eval(src: &str) -> Result<i16, ExecError> {
        let tape = Tape::new();
        let vars = VariableTable::new();
        let mut cur = Cursor::new(src.as_bytes(), 0);
        expression(&mut cur, &tape, &vars)
    }

    #[test]
    fn test_flat_left_to_right_chain() {
        // no precedence: (2+3)*4, not 2+(3*4)
        assert_eq!(eval("2+3*4"), Ok(20));
        assert_eq!(eval("10-2-3"), Ok(5));
        assert_eq!(eval("7&5|8"), Ok(13));
    }

    #[test]
    fn test_truncation_at_every_level() {
        assert_eq!(eval("(100+100)"), Ok(-56));
        assert_eq!(eval("((100+100))"), Ok(-56));
        // the chain itself is only truncated at the end
        assert_eq!(eval("100+100-100"), Ok(100));
    }

    #[test]
    fn test_parenthesized_group_first_only() {
        assert_eq!(eval("(2+3)*4"), Ok(20));
        // a group is not a chain operand
        assert_eq!(eval("2+(3*4)"), Err(ExecError::Operand));
    }

    #[test]
    fn test_unbalanced_parenthesis() {
        assert_eq!(eval("(1+2"), Err(ExecError::Syntax));
    }

    #[test]
    fn test_division() {
        assert_eq!(eval("100/7"), Ok(14));
        assert_eq!(eval("5/0"), Err(ExecError::Operand));
    }

    #[test]
    fn test_symbol_test_reads_head() {
        let mut tape = Tape::new();
        let vars = VariableTable::new();
        tape.write(Symbol::Red);

        let mut cur = Cursor::new(b"R", 0);
        assert_eq!(expression(&mut cur, &tape, &vars), Ok(1));
        let mut cur = Cursor::new(b"G", 0);
        assert_eq!(expression(&mut cur, &tape, &vars), Ok(0));

        // off the tape everything reads black
        tape.move_by(-1);
        let mut cur = Cursor::new(b"K", 0);
        assert_eq!(expression(&mut cur, &tape, &vars), Ok(1));
        let mut cur = Cursor::new(b"R", 0);
        assert_eq!(expression(&mut cur, &tape, &vars), Ok(0));
    }

    #[test]
    fn test_variable_operand() {
        let tape = Tape::new();
        let mut vars = VariableTable::new();
        let slot = vars.bind(&Name::from("x")).unwrap();
        vars.set_at(slot, -3);

        let mut cur = Cursor::new(b"$x*2", 0);
        assert_eq!(expression(&mut cur, &tape, &vars), Ok(-6));

        let mut cur = Cursor::new(b"$missing", 0);
        assert!(matches!(
            expression(&mut cur, &tape, &vars),
            Err(ExecError::VariableNotFound { .. })
        ));
    }

    #[test]
    fn test_bad_operand_start() {
        assert_eq!(eval("@"), Err(ExecError::Operand));
        assert_eq!(eval("1+@"), Err(ExecError::Operand));
    }
}
