//! App module - shared session state and commands
//!
//! Provides common state and command processing used by both CLI and GUI.

mod commands;
mod state;

pub use commands::*;
pub use state::*;
