//! GUI Module
//!
//! egui front end: map panel and record table in a resizable split view.

mod app;
mod menu;
mod messages;
mod panels;
mod state;
mod status_bar;
mod toolbar;
pub mod theme;
pub mod viewport;

pub use app::DikeFinderApp;
pub use messages::AsyncMessage;
pub use state::AppState;
