//! Status bar rendering at the bottom of the window.

use eframe::egui;
use super::state::AppState;
use super::theme::catppuccin;

/// Render the status bar at the very bottom.
pub fn render(ctx: &egui::Context, state: &AppState) {
    egui::TopBottomPanel::bottom("status_bar")
        .exact_height(24.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                // Data source
                let table = &state.session.table;
                ui.label(
                    egui::RichText::new(format!(
                        "{} | {} of {} records",
                        truncate_path(&state.session.source_label(), 30),
                        table.visible_len(),
                        table.len()
                    ))
                    .color(catppuccin::SUBTEXT0)
                    .small(),
                );

                ui.separator();

                // Image directory
                match state.session.images.path() {
                    Some(dir) if state.session.images.is_valid() => {
                        ui.label(
                            egui::RichText::new(format!(
                                "● {} | {} filters",
                                truncate_path(&dir.display().to_string(), 30),
                                state.session.prefixes.len()
                            ))
                            .color(catppuccin::GREEN)
                            .small(),
                        );
                    }
                    _ => {
                        ui.label(
                            egui::RichText::new("○ No image directory")
                                .color(catppuccin::OVERLAY0)
                                .small(),
                        );
                    }
                }

                if state.measure.active {
                    ui.separator();
                    ui.label(egui::RichText::new("◉ Measuring").color(catppuccin::YELLOW).small());
                }

                if let Some(msg) = state.status_message() {
                    ui.separator();
                    ui.label(egui::RichText::new(msg).color(catppuccin::TEXT).small());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(concat!("DikeFinder v", env!("CARGO_PKG_VERSION")))
                            .color(catppuccin::LAVENDER)
                            .small(),
                    );
                });
            });
        });
}

/// Truncate a path for display
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }
    // Try to show the filename
    if let Some(name) = std::path::Path::new(path).file_name().and_then(|n| n.to_str()) {
        if name.chars().count() <= max_len {
            return name.to_string();
        }
    }
    let skip = path.chars().count() - max_len.saturating_sub(3);
    let tail: String = path.chars().skip(skip).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_path() {
        assert_eq!(truncate_path("short.xlsx", 30), "short.xlsx");
        assert_eq!(
            truncate_path("/very/long/directory/name/that/goes/on/data.xlsx", 20),
            "data.xlsx"
        );
        let t = truncate_path("석영맥석영맥석영맥석영맥석영맥석영맥", 10);
        assert_eq!(t.chars().count(), 10);
        assert!(t.starts_with("..."));
    }
}
