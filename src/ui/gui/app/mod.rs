//! Main application orchestrator for the DikeFinder GUI.
//!
//! This module assembles all UI panels and handles the main event loop.
//! Individual panels are defined in the `panels` module.

pub mod file_ops;
pub mod handlers;
pub mod selection;

use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::app::Session;
use crate::config::ViewerConfig;

use super::menu::{self, MenuAction};
use super::messages::{AsyncMessage, DialogPurpose};
use super::panels::console::ConsoleAction;
use super::panels::{alert, console, data_table, filter_bar, map_view};
use super::state::AppState;
use super::{status_bar, toolbar};

/// Main application struct that implements eframe::App
pub struct DikeFinderApp {
    /// Shared application state
    state: AppState,

    /// Channel for receiving async messages
    rx: Receiver<AsyncMessage>,

    /// Channel sender (cloned for helper threads)
    tx: Sender<AsyncMessage>,

    /// Theme initialization flag
    theme_initialized: bool,
}

impl Default for DikeFinderApp {
    fn default() -> Self {
        Self::new(Session::new(), &ViewerConfig::default())
    }
}

impl DikeFinderApp {
    pub fn new(session: Session, config: &ViewerConfig) -> Self {
        let (tx, rx) = channel();
        let mut state = AppState::new(session, config);
        if let Some(dir) = state.session.images.path() {
            let line = format!(
                "[*] Image directory: {} ({} filters)",
                dir.display(),
                state.session.prefixes.len()
            );
            state.log(line);
        }
        Self {
            state,
            rx,
            tx,
            theme_initialized: false,
        }
    }
}

impl eframe::App for DikeFinderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Initialize theme on first frame
        if !self.theme_initialized {
            super::theme::init(ctx);
            self.theme_initialized = true;
        }

        // Process async messages
        handlers::process_messages(ctx, &mut self.state, &self.rx, &self.tx);

        // Top: menu, toolbar, filter buttons
        let menu_action = menu::render(ctx, &mut self.state);
        self.handle_menu_action(ctx, menu_action);
        let toolbar_action = toolbar::render(ctx, &mut self.state);
        self.handle_menu_action(ctx, toolbar_action);
        if let Some(prefix) = filter_bar::render(ctx, &self.state) {
            selection::show_prefix(&mut self.state, self.tx.clone(), &prefix);
        }

        // Bottom: status bar, optional console
        status_bar::render(ctx, &self.state);
        if let ConsoleAction::Command(cmd) = console::render(ctx, &mut self.state) {
            handlers::process_command(ctx, &mut self.state, self.tx.clone(), &cmd);
        }

        // Split view: map on the left (resizable), table fills the rest
        map_view::render(ctx, &mut self.state);
        if let Some(row) = data_table::render(ctx, &mut self.state) {
            selection::select_row(&mut self.state, self.tx.clone(), row);
        }

        alert::render(ctx, &mut self.state);

        // Keep polling while helper threads are busy or a status message is showing
        if self.state.loading
            || self.state.georeferencing
            || self.state.map.requested.is_some()
            || self.state.status_message().is_some()
        {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

impl DikeFinderApp {
    fn handle_menu_action(&mut self, ctx: &egui::Context, action: MenuAction) {
        let data_dir = self.state.session.images.path().map(|p| p.to_path_buf());
        match action {
            MenuAction::LoadExcel => {
                file_ops::open_dialog(self.tx.clone(), DialogPurpose::LoadExcel, data_dir)
            }
            MenuAction::SetImageDirectory => {
                file_ops::open_dialog(self.tx.clone(), DialogPurpose::ImageDirectory, data_dir)
            }
            MenuAction::ExportCsv => {
                file_ops::open_dialog(self.tx.clone(), DialogPurpose::ExportCsv, None)
            }
            MenuAction::Georeference => {
                file_ops::open_dialog(self.tx.clone(), DialogPurpose::Georeference, data_dir)
            }
            MenuAction::ClearConsole => {
                self.state.clear_logs();
                self.state.log("[*] Console cleared");
            }
            MenuAction::ShowAbout => {
                self.state.show_alert(
                    "About DikeFinder",
                    format!(
                        "DikeFinder v{}\nGeological dike viewer: map sheets and field records side by side.",
                        env!("CARGO_PKG_VERSION")
                    ),
                );
            }
            MenuAction::Exit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            MenuAction::None => {}
        }
    }
}
