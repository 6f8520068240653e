//! Console panel - log output and command input.

use eframe::egui;

use super::super::state::AppState;
use super::super::theme::catppuccin;

/// Actions that can be triggered from the console panel
pub enum ConsoleAction {
    /// User entered a command
    Command(String),
    /// No action
    None,
}

/// Color for a log line by its `[*]`/`[✓]`/`[✗]`/`[!]` prefix
pub fn line_color(line: &str) -> egui::Color32 {
    if line.starts_with("[✓]") {
        catppuccin::GREEN
    } else if line.starts_with("[✗]") {
        catppuccin::RED
    } else if line.starts_with("[!]") {
        catppuccin::YELLOW
    } else if line.starts_with("[*]") || line.starts_with('>') {
        catppuccin::BLUE
    } else {
        catppuccin::SUBTEXT0
    }
}

/// Render the console panel at the bottom (View > Console).
///
/// Returns any command entered by the user.
pub fn render(ctx: &egui::Context, state: &mut AppState) -> ConsoleAction {
    let mut action = ConsoleAction::None;
    if !state.show_console {
        return action;
    }

    egui::TopBottomPanel::bottom("console_panel")
        .resizable(true)
        .default_height(160.0)
        .min_height(80.0)
        .max_height(400.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("[Console]");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Hide").clicked() {
                        state.show_console = false;
                    }
                    if ui.small_button("Clear").clicked() {
                        state.log_buffer.clear();
                    }
                    if ui.small_button("📋 Copy All").clicked() {
                        let all_logs = state.log_buffer.join("\n");
                        ui.output_mut(|o| o.copied_text = all_logs);
                    }
                });
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .max_height(ui.available_height() - 30.0)
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in &state.log_buffer {
                        ui.label(egui::RichText::new(line).monospace().color(line_color(line)));
                    }
                });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label(">");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut state.cli_input)
                        .desired_width(ui.available_width() - 60.0)
                        .font(egui::TextStyle::Monospace)
                        .hint_text("Type 'help' for commands"),
                );
                let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if entered {
                    response.request_focus();
                }
                if entered || ui.button("Run").clicked() {
                    if let Some(cmd) = take_command(state) {
                        action = ConsoleAction::Command(cmd);
                    }
                }
            });
        });

    action
}

/// Echo and clear the input line
fn take_command(state: &mut AppState) -> Option<String> {
    let cmd = state.cli_input.trim().to_string();
    state.cli_input.clear();
    if cmd.is_empty() {
        return None;
    }
    state.log(format!("> {}", cmd));
    Some(cmd)
}
