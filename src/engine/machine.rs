//! The machine proper: program, cursor, tape, variables, wait state
//!
//! [`Machine`] is everything that survives from one step to the next, and
//! [`Machine::step`] is one full step attempt. It is a pure state machine:
//! no clocks, no storage, no lights. The surrounding [`Device`] wires
//! those in.
//!
//! The wait-periods counter is the single source of truth for the
//! halted/waiting/runnable distinction: negative means halted until the
//! next reset, positive means idling (one period consumed per step
//! attempt), zero means the next attempt executes an instruction.
//!
//! [`Device`]: super::device::Device

use super::errors::ExecError;
use crate::memory::{ProgramBuffer, Tape, VariableTable};
use crate::parser::{chars, Cursor};

/// What a step attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One instruction was executed. `waiting` is true when that
    /// instruction put the machine into a wait.
    Executed { waiting: bool },

    /// The machine was waiting; one idle period was consumed instead of
    /// executing.
    Waited,

    /// The machine is halted; nothing happened.
    Halted,

    /// The cursor reached the end of the program (or the program is
    /// empty). The caller should stop the scheduler.
    Finished,
}

/// Full execution state of the language engine.
#[derive(Debug, Clone)]
pub struct Machine {
    pub(super) program: ProgramBuffer,
    pub(super) tape: Tape,
    pub(super) vars: VariableTable,
    pub(super) pos: usize,
    pub(super) wait_periods: i8,
}

impl Machine {
    pub fn new() -> Self {
        Machine {
            program: ProgramBuffer::new(),
            tape: Tape::new(),
            vars: VariableTable::new(),
            pos: 0,
            wait_periods: 0,
        }
    }

    /// Full reset: tape cleared, variables dropped, cursor and wait state
    /// rewound. The program text itself stays, but the next load will
    /// overwrite it from the start.
    pub fn reset(&mut self) {
        self.tape.reset();
        self.vars.reset();
        self.pos = 0;
        self.wait_periods = 0;
        self.program.rewind();
    }

    /// Append a load chunk to the program buffer.
    pub fn load(&mut self, payload: &[u8]) {
        self.program.append(payload);
    }

    /// Force the cursor to end-of-program so no further step can execute.
    /// The error path ends here.
    pub fn halt_at_end(&mut self) {
        self.pos = self.program.len();
    }

    pub fn program(&self) -> &ProgramBuffer {
        &self.program
    }

    pub(crate) fn program_mut(&mut self) -> &mut ProgramBuffer {
        &mut self.program
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn variables(&self) -> &VariableTable {
        &self.vars
    }

    /// Current cursor position into the program text.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The wait-periods counter: negative halted, positive waiting, zero
    /// runnable.
    pub fn wait_periods(&self) -> i8 {
        self.wait_periods
    }

    pub fn is_halted(&self) -> bool {
        self.wait_periods < 0
    }

    /// One step attempt. Consumes a wait period if one is pending,
    /// otherwise skips whitespace, comments and label markers, then
    /// executes exactly one instruction.
    pub fn step(&mut self) -> Result<StepOutcome, ExecError> {
        if self.wait_periods < 0 {
            return Ok(StepOutcome::Halted);
        }

        if self.wait_periods > 0 {
            self.wait_periods -= 1;
            return Ok(StepOutcome::Waited);
        }

        if self.program.is_empty() || self.pos >= self.program.len() {
            return Ok(StepOutcome::Finished);
        }

        // step over whitespace and label markers
        let mut cur = Cursor::new(self.program.text(), self.pos);
        loop {
            cur.skip_space();
            if cur.current() != b'#' {
                break;
            }
            cur.step();
            while chars::is_name(cur.current()) {
                cur.step();
            }
        }
        self.pos = cur.pos();

        if self.pos >= self.program.len() {
            return Ok(StepOutcome::Finished);
        }

        self.execute_instruction()?;

        if self.wait_periods > 0 {
            self.wait_periods -= 1;
            return Ok(StepOutcome::Executed { waiting: true });
        }

        Ok(StepOutcome::Executed { waiting: false })
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
