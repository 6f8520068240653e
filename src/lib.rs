//! DikeFinder - geological dike viewer
//!
//! Map sheets and field records side by side, with georeferencing and
//! measuring tools. The binary wires these modules into a GUI or a REPL.

pub mod app;
pub mod config;
pub mod data;
pub mod geodesy;
pub mod imagery;
pub mod ui;
