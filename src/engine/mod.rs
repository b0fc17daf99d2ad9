//! The language engine
//!
//! This module is the heart of the device:
//! - [`machine`]: the execution state and the single-step state machine
//! - [`instructions`]: per-opcode execute and skip routines
//! - [`scheduler`]: tick-driven step rate limiting
//! - [`device`]: the controller wiring machine, scheduler, settings,
//!   display and host commands together
//! - [`errors`]: the six fatal error kinds and their blink codes
//!
//! # Execution model
//!
//! The host loads program text and starts the scheduler; every elapsed
//! step quantum executes exactly one instruction. There is no separate
//! parse phase: instructions are parsed as they are executed, and a
//! failed conditional advances over its target with skip routines that
//! parse identically but leave all state untouched.

pub mod device;
pub mod errors;
pub mod instructions;
pub mod machine;
pub mod scheduler;

pub use device::Device;
pub use errors::ExecError;
pub use machine::{Machine, StepOutcome};
pub use scheduler::Scheduler;
