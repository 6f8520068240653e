//! Menu bar rendering.

use eframe::egui;
use super::state::AppState;

/// Actions triggered from menu
pub enum MenuAction {
    LoadExcel,
    SetImageDirectory,
    ExportCsv,
    Georeference,
    ClearConsole,
    ShowAbout,
    Exit,
    None,
}

/// Render the top menu bar.
///
/// Returns any action triggered by menu clicks.
pub fn render(ctx: &egui::Context, state: &mut AppState) -> MenuAction {
    let mut action = MenuAction::None;

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Load Excel Data...").clicked() {
                    action = MenuAction::LoadExcel;
                    ui.close_menu();
                }
                if ui.button("Set Image Directory...").clicked() {
                    action = MenuAction::SetImageDirectory;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Export Visible Rows (CSV)...").clicked() {
                    action = MenuAction::ExportCsv;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    action = MenuAction::Exit;
                }
            });

            ui.menu_button("View", |ui| {
                ui.checkbox(&mut state.show_console, "Console");
                if ui.button("Clear Console").clicked() {
                    action = MenuAction::ClearConsole;
                    ui.close_menu();
                }
            });

            ui.menu_button("Tools", |ui| {
                if ui.button("Georeference Excel...").clicked() {
                    action = MenuAction::Georeference;
                    ui.close_menu();
                }
                let label = if state.measure.active { "Stop Measuring" } else { "Measure Distance" };
                if ui.button(label).clicked() {
                    state.measure.toggle();
                    ui.close_menu();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    action = MenuAction::ShowAbout;
                    ui.close_menu();
                }
            });
        });
    });

    action
}
