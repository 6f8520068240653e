//! Photo-name filter buttons, one per map image prefix.

use eframe::egui::{self, RichText};

use super::super::state::AppState;

/// Render the wrapping filter bar. Returns the clicked prefix ("" for All).
pub fn render(ctx: &egui::Context, state: &AppState) -> Option<String> {
    let mut clicked = None;
    let current = state.session.table.filter();

    egui::TopBottomPanel::top("filter_bar").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("Filter:").strong());
            if ui.selectable_label(current.is_empty(), "All").clicked() {
                clicked = Some(String::new());
            }
            if state.session.prefixes.is_empty() {
                ui.label(RichText::new("Set an image directory to enable photo filters").weak());
                return;
            }
            for prefix in state.session.prefixes.keys() {
                if ui.selectable_label(current == prefix, prefix).clicked() {
                    clicked = Some(prefix.clone());
                }
            }
        });
    });

    clicked
}
