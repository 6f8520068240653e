//! Modal message box for load failures and finished jobs.

use eframe::egui;

use super::super::state::AppState;

pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let Some(alert) = state.alert.as_ref() else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new(alert.title.as_str())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(alert.message.as_str());
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

    if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        state.alert = None;
    }
}
