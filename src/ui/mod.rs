//! Terminal simulator built on [ratatui](https://docs.rs/ratatui).
//!
//! Stands in for the physical device: the light strip, the program with
//! the execution cursor, the variable bindings and the machine state are
//! drawn live while the engine runs off the wall clock. Every user action
//! is delivered to the engine as a host command buffer, so the simulator
//! exercises exactly the protocol a real host would.

pub mod app;
pub mod theme;

pub use app::App;
