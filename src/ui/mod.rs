//! UI module - Command Line Interface and Graphical Interface
//!
//! Provides both CLI (reedline-based REPL) and GUI (egui) interfaces.

pub mod cli;
pub mod gui;
