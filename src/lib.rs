//! # Introduction
//!
//! Lumitape is the runtime of a pocket Turing machine: a row of 27
//! colored light cells programmed in a tiny line-oriented instruction
//! language over a host command link. This crate is the complete language
//! engine — cursor-based parse-as-you-execute evaluation, a real-time
//! step scheduler, strictly bounded memory (10 variables, 256 program
//! bytes, 27 tape cells), and an erase-before-write persistence protocol
//! — plus a terminal simulator that stands in for the physical device.
//!
//! ## Execution pipeline
//!
//! ```text
//! Host command → Device → Scheduler tick → Machine step → Tape/LEDs
//! ```
//!
//! 1. [`protocol`] — decodes host command buffers (reset, load, run,
//!    step, speed, highlight, store).
//! 2. [`engine`] — the machine, instruction executor, scheduler and
//!    device controller.
//! 3. [`parser`] — the program cursor and the one-pass expression
//!    evaluator (flat left-to-right operator chains, signed 8-bit
//!    truncation at every parenthesis level).
//! 4. [`memory`] — the fixed-capacity stores: tape, variables, program.
//! 5. [`storage`] — row-erased non-volatile records with sentinel
//!    detection.
//! 6. [`hal`] — capability traits for clock, storage and lights, with
//!    software doubles for tests and the simulator.
//! 7. [`ui`] — ratatui-based simulator front-end; not part of the stable
//!    library API.
//!
//! ## The instruction language
//!
//! Movement `<` `>` `<<` `>>` `<expr` `>expr`; symbol writes `R G B C M Y
//! W K`; assignment `$x=expr`, `$x++`, `$x--`; conditionals `?expr`
//! (with `!`, `>`, `>=`, `<`, `<=` forms) skipping the next instruction
//! when false; labels `#name` and branches `^name`; waits `%` and
//! `%expr`, with `%0` halting for good; comments `;` to end of line.

pub mod engine;
pub mod hal;
pub mod memory;
pub mod parser;
pub mod protocol;
pub mod storage;
pub mod ui;
