//! The device controller
//!
//! [`Device`] wires the pure [`Machine`] to the outside world: the
//! scheduler decides when a step fires, host commands mutate the program
//! and settings, the tape display is refreshed after every executed
//! instruction, and errors become indicator blinks. All hardware access
//! goes through the capability traits in [`crate::hal`], so a device runs
//! unchanged against real time or a test clock.

use super::errors::ExecError;
use super::machine::{Machine, StepOutcome};
use super::scheduler::Scheduler;
use crate::hal::{Clock, NonVolatileStore, Rgb, TapePanel};
use crate::memory::{Symbol, NUM_CELLS};
use crate::protocol::Command;
use crate::storage::{self, Settings};

/// Channel level for the cell under the head when highlighting is on.
const HI_BRIGHTNESS: u8 = 0x60;

/// Channel level for every other lit cell.
const LO_BRIGHTNESS: u8 = 0x20;

/// The engine plus its scheduler and settings.
#[derive(Debug, Clone)]
pub struct Device {
    machine: Machine,
    scheduler: Scheduler,
    settings: Settings,
}

impl Device {
    pub fn new() -> Self {
        let settings = Settings::default();
        let mut scheduler = Scheduler::new();
        scheduler.set_speed(settings.clock_speed);
        Device {
            machine: Machine::new(),
            scheduler,
            settings,
        }
    }

    /// Restore persisted state and, if a stored program is present, start
    /// running it. This is the power-on path.
    pub fn power_on<N, P>(&mut self, nvm: &N, panel: &mut P)
    where
        N: NonVolatileStore,
        P: TapePanel,
    {
        self.settings = storage::load_settings(nvm);
        self.scheduler.set_speed(self.settings.clock_speed);

        if storage::load_program(nvm, self.machine.program_mut()) {
            self.reset(panel);
            self.scheduler.start();
        }
    }

    /// Poll the tick counter; when a step quantum has elapsed, perform
    /// one step attempt. Call this from the foreground loop.
    pub fn exec<C, P>(&mut self, clock: &mut C, panel: &mut P)
    where
        C: Clock,
        P: TapePanel,
    {
        if self.scheduler.poll(clock.now_ms()) {
            self.step_attempt(panel);
        }
    }

    /// One step attempt against the machine, with the surrounding device
    /// duties: refresh the display after an executed instruction, stop on
    /// end-of-program, turn errors into blinks and a forced halt.
    /// Returns true when an instruction actually executed and the machine
    /// is still runnable.
    pub fn step_attempt<P: TapePanel>(&mut self, panel: &mut P) -> bool {
        match self.machine.step() {
            Ok(StepOutcome::Executed { waiting }) => {
                self.refresh_tape(panel);
                !waiting
            }
            Ok(StepOutcome::Waited) | Ok(StepOutcome::Halted) => false,
            Ok(StepOutcome::Finished) => {
                self.scheduler.stop();
                false
            }
            Err(error) => {
                self.fail(&error, panel);
                false
            }
        }
    }

    /// Full engine reset: stop stepping, clear the machine, restart the
    /// step interval, blank the display.
    pub fn reset<P: TapePanel>(&mut self, panel: &mut P) {
        self.scheduler.stop();
        self.machine.reset();
        self.scheduler.reload();
        self.refresh_tape(panel);
    }

    /// Apply one decoded host command.
    pub fn handle<C, N, P>(&mut self, cmd: Command<'_>, clock: &mut C, nvm: &mut N, panel: &mut P)
    where
        C: Clock,
        N: NonVolatileStore,
        P: TapePanel,
    {
        match cmd {
            Command::Reset => self.reset(panel),

            Command::Load(payload) => self.machine.load(payload),

            Command::Run => {
                self.reset(panel);
                self.scheduler.start();
            }

            Command::Step => {
                self.scheduler.stop();
                self.step_attempt(panel);
            }

            Command::SetSpeed(ips) => {
                if ips != 0 {
                    self.settings.clock_speed = ips;
                    self.scheduler.set_speed(ips);
                }
            }

            Command::SetHighlight(on) => {
                self.settings.tapehead_highlighting = on;
            }

            Command::Store => {
                storage::store(clock, nvm, &self.settings, self.machine.program());
                panel.flash_indicator(1);
            }
        }
    }

    /// Decode and apply one raw command buffer. Malformed buffers are
    /// dropped silently.
    pub fn process<C, N, P>(&mut self, buffer: &[u8], clock: &mut C, nvm: &mut N, panel: &mut P)
    where
        C: Clock,
        N: NonVolatileStore,
        P: TapePanel,
    {
        if let Some(cmd) = Command::decode(buffer) {
            self.handle(cmd, clock, nvm, panel);
        }
    }

    fn fail<P: TapePanel>(&mut self, error: &ExecError, panel: &mut P) {
        panel.flash_indicator(error.blinks());
        self.scheduler.stop();
        self.machine.halt_at_end();
        self.refresh_tape(panel);
    }

    /// Redraw every tape cell, brightening the one under the head when
    /// highlighting is on.
    pub fn refresh_tape<P: TapePanel>(&self, panel: &mut P) {
        let head = self.machine.tape().head();
        for index in 0..NUM_CELLS {
            let brightness = if self.settings.tapehead_highlighting && index as i8 == head {
                HI_BRIGHTNESS
            } else {
                LO_BRIGHTNESS
            };
            panel.set_led(index, led_color(self.machine.tape().cell(index), brightness));
        }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// True while the scheduler is stepping the program.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel levels for a symbol at a given brightness.
fn led_color(symbol: Symbol, brightness: u8) -> Rgb {
    let b = brightness;
    match symbol {
        Symbol::Red => Rgb::new(b, 0, 0),
        Symbol::Green => Rgb::new(0, b, 0),
        Symbol::Blue => Rgb::new(0, 0, b),
        Symbol::Cyan => Rgb::new(0, b, b),
        Symbol::Magenta => Rgb::new(b, 0, b),
        Symbol::Yellow => Rgb::new(b, b, 0),
        Symbol::White => Rgb::new(b, b, b),
        Symbol::Black => Rgb::OFF,
    }
}
