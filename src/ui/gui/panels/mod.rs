//! GUI panel modules.
//!
//! Each panel is rendered as a separate egui panel.

pub mod alert;
pub mod console;
pub mod data_table;
pub mod filter_bar;
pub mod map_view;
