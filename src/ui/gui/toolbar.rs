//! Toolbar below the menu: data buttons and viewer options.

use eframe::egui;

use super::menu::MenuAction;
use super::state::AppState;

/// Render the toolbar. Button clicks map onto the menu actions.
pub fn render(ctx: &egui::Context, state: &mut AppState) -> MenuAction {
    let mut action = MenuAction::None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Set Image Directory").clicked() {
                action = MenuAction::SetImageDirectory;
            }
            if ui
                .add_enabled(!state.loading, egui::Button::new("Load Excel Data"))
                .clicked()
            {
                action = MenuAction::LoadExcel;
            }
            if ui
                .add_enabled(!state.georeferencing, egui::Button::new("Georeference"))
                .on_hover_text("Compute lat/lng for every row of a workbook")
                .clicked()
            {
                action = MenuAction::Georeference;
            }

            ui.separator();
            ui.checkbox(&mut state.center_on_select, "Center clicked row")
                .on_hover_text("Zoom to 200% and center on the clicked row instead of fitting");

            let mut verbose = state.verbose;
            if ui.checkbox(&mut verbose, "Verbose").changed() {
                state.set_verbose(verbose);
            }

            if state.loading || state.georeferencing {
                ui.separator();
                ui.spinner();
            }
        });
    });

    action
}
