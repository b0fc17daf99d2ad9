//! Instruction executor
//!
//! Dispatch is on the instruction's leading character, and every opcode
//! comes in two forms: an execute form that mutates the machine, and a
//! skip form that parses the same text without touching state. Failed
//! conditionals use the skip forms on the following instruction, which is
//! what keeps cursor advancement identical on both paths: after either
//! form the cursor sits at the start of the next instruction.
//!
//! Skip forms still evaluate any embedded expressions, so an unbound
//! variable inside a skipped instruction is an error just as it would be
//! when executed.

use super::errors::ExecError;
use super::machine::Machine;
use crate::memory::{Name, Symbol, Tape, VariableTable};
use crate::parser::expr::expression;
use crate::parser::{chars, Cursor};

impl Machine {
    /// Execute the single instruction at the cursor and advance past it.
    pub(super) fn execute_instruction(&mut self) -> Result<(), ExecError> {
        let Machine {
            program,
            tape,
            vars,
            pos,
            wait_periods,
        } = self;

        let mut cur = Cursor::new(program.text(), *pos);
        let result = execute(&mut cur, tape, vars, wait_periods);
        *pos = cur.pos();
        result
    }
}

fn execute(
    cur: &mut Cursor,
    tape: &mut Tape,
    vars: &mut VariableTable,
    wait_periods: &mut i8,
) -> Result<(), ExecError> {
    match cur.current() {
        b'<' | b'>' => movement(cur, tape, vars),
        b'$' => assignment(cur, tape, vars),
        b'?' => conditional(cur, tape, vars),
        b'^' => branch(cur),
        b'%' => wait(cur, tape, vars, wait_periods),
        c if chars::is_symbol(c) => write_symbol(cur, tape),
        _ => Err(ExecError::Instruction),
    }
}

/// Advance over one instruction without executing it.
fn skip(cur: &mut Cursor, tape: &Tape, vars: &VariableTable) -> Result<(), ExecError> {
    match cur.current() {
        b'<' | b'>' => skip_movement(cur, tape, vars),
        b'$' => skip_assignment(cur, tape, vars),
        b'?' => skip_conditional(cur, tape, vars),
        b'^' => {
            cur.step();
            cur.name();
            Ok(())
        }
        b'%' => skip_wait(cur, tape, vars),
        c if chars::is_symbol(c) => {
            cur.step();
            Ok(())
        }
        // anything unrecognized is left for the execute path to reject
        _ => Ok(()),
    }
}

/// `<` / `>` one cell, `<<` / `>>` to the extremes, `<expr` / `>expr` by a
/// signed offset. The head clamps to the off-tape margins.
fn movement(cur: &mut Cursor, tape: &mut Tape, vars: &VariableTable) -> Result<(), ExecError> {
    let dir = cur.current();
    let c = cur.next();

    if c == dir {
        cur.step();
        if dir == b'<' {
            tape.move_to_first();
        } else {
            tape.move_to_last();
        }
        return Ok(());
    }

    let delta = if chars::is_expression_start(c) {
        expression(cur, tape, vars)?
    } else {
        1
    };

    tape.move_by(if dir == b'<' { -delta } else { delta });
    Ok(())
}

fn skip_movement(cur: &mut Cursor, tape: &Tape, vars: &VariableTable) -> Result<(), ExecError> {
    let dir = cur.current();
    let c = cur.next();

    if c == dir {
        cur.step();
    } else if chars::is_expression_start(c) {
        expression(cur, tape, vars)?;
    }
    Ok(())
}

/// `$x++` / `$x--` with saturation, or `$x=expr`. The variable is bound
/// before the trailing form is examined, so even a malformed assignment
/// can use up a table slot.
fn assignment(cur: &mut Cursor, tape: &Tape, vars: &mut VariableTable) -> Result<(), ExecError> {
    cur.step();
    let name = cur.name();
    let slot = vars.bind(&name).ok_or(ExecError::TooManyVariables)?;

    cur.skip_space();

    match cur.current() {
        b'+' => {
            if cur.next() == b'+' {
                cur.step();
                let value = vars.value_at(slot);
                vars.set_at(slot, value.saturating_add(1));
                return Ok(());
            }
        }
        b'-' => {
            if cur.next() == b'-' {
                cur.step();
                let value = vars.value_at(slot);
                vars.set_at(slot, value.saturating_sub(1));
                return Ok(());
            }
        }
        b'=' => {
            cur.step();
            let value = expression(cur, tape, vars)?;
            vars.set_at(slot, value as i8);
            return Ok(());
        }
        _ => {}
    }

    Err(ExecError::Syntax)
}

fn skip_assignment(cur: &mut Cursor, tape: &Tape, vars: &VariableTable) -> Result<(), ExecError> {
    cur.step();
    cur.name();

    cur.skip_space();

    match cur.current() {
        b'+' => {
            if cur.next() == b'+' {
                cur.step();
            }
        }
        b'-' => {
            if cur.next() == b'-' {
                cur.step();
            }
        }
        b'=' => {
            cur.step();
            expression(cur, tape, vars)?;
        }
        _ => {}
    }
    Ok(())
}

/// `?!e` zero, `?>=e` / `?<=e` / `?>e` / `?<e` sign tests, bare `?e`
/// non-zero. A false test skips exactly the next instruction.
fn conditional(cur: &mut Cursor, tape: &Tape, vars: &VariableTable) -> Result<(), ExecError> {
    let c = cur.next();

    let test = if c == b'!' {
        cur.step();
        expression(cur, tape, vars)? == 0
    } else if c == b'>' {
        if cur.next() == b'=' {
            cur.step();
            expression(cur, tape, vars)? >= 0
        } else {
            expression(cur, tape, vars)? > 0
        }
    } else if c == b'<' {
        if cur.next() == b'=' {
            cur.step();
            expression(cur, tape, vars)? <= 0
        } else {
            expression(cur, tape, vars)? < 0
        }
    } else {
        expression(cur, tape, vars)? != 0
    };

    if !test {
        cur.skip_space();
        skip(cur, tape, vars)?;
    }
    Ok(())
}

/// The skip form of a conditional also skips the instruction it guards,
/// so a skipped conditional and its target move over as one unit.
fn skip_conditional(cur: &mut Cursor, tape: &Tape, vars: &VariableTable) -> Result<(), ExecError> {
    let c = cur.next();

    if c == b'!' {
        cur.step();
    } else if c == b'>' {
        if cur.next() == b'=' {
            cur.step();
        }
    } else if c == b'<' {
        if cur.next() == b'=' {
            cur.step();
        }
    }
    expression(cur, tape, vars)?;

    cur.skip_space();
    skip(cur, tape, vars)
}

/// `^name`: jump to the instruction after the first matching `#name`
/// marker in program order.
fn branch(cur: &mut Cursor) -> Result<(), ExecError> {
    cur.step();
    let label = cur.name();
    let target = find_label(cur.text(), &label)?;
    cur.set_pos(target);
    Ok(())
}

/// Scan the program from the start for a `#label` marker, returning the
/// position immediately after the label name. Callers commit the returned
/// position themselves.
pub(crate) fn find_label(text: &[u8], label: &Name) -> Result<usize, ExecError> {
    let mut cur = Cursor::new(text, 0);
    loop {
        if cur.at_end() {
            return Err(ExecError::LabelNotFound {
                name: label.to_string(),
            });
        }

        cur.skip_space();

        if cur.current() != b'#' {
            cur.step();
            continue;
        }
        cur.step();
        if cur.name() == *label {
            return Ok(cur.pos());
        }
    }
}

/// `%` waits one step, `%expr` waits that many; `%0` halts for good.
fn wait(
    cur: &mut Cursor,
    tape: &Tape,
    vars: &VariableTable,
    wait_periods: &mut i8,
) -> Result<(), ExecError> {
    *wait_periods = 1;
    if chars::is_expression_start(cur.next()) {
        let n = expression(cur, tape, vars)?;
        *wait_periods = n as i8;
        if *wait_periods == 0 {
            *wait_periods = -1;
        }
    }
    Ok(())
}

fn skip_wait(cur: &mut Cursor, tape: &Tape, vars: &VariableTable) -> Result<(), ExecError> {
    if chars::is_expression_start(cur.next()) {
        expression(cur, tape, vars)?;
    }
    Ok(())
}

/// One of the eight symbol letters: write it at the head. Off-tape
/// positions swallow the write.
fn write_symbol(cur: &mut Cursor, tape: &mut Tape) -> Result<(), ExecError> {
    if let Some(symbol) = Symbol::from_char(cur.current()) {
        cur.step();
        tape.write(symbol);
    }
    Ok(())
}
