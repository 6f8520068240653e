//! Message and command handlers.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender};

use eframe::egui;

use crate::app::{execute, parse_command, AppCommand, CommandEffect};
use crate::geodesy::{transform_for_photo, GeorefReport};
use crate::imagery::MapImage;
use crate::ui::gui::messages::{AsyncMessage, DialogPurpose};
use crate::ui::gui::state::AppState;

use super::{file_ops, selection};

/// Process pending async messages from background threads
pub fn process_messages(
    ctx: &egui::Context,
    state: &mut AppState,
    rx: &Receiver<AsyncMessage>,
    tx: &Sender<AsyncMessage>,
) {
    while let Ok(msg) = rx.try_recv() {
        match msg {
            AsyncMessage::FileSelected { purpose, path: Some(path) } => {
                on_file_selected(state, tx.clone(), purpose, &path);
            }
            AsyncMessage::FileSelected { path: None, .. } => {
                // User cancelled
            }
            AsyncMessage::WorkbookLoaded { path, result: Ok(records) } => {
                state.loading = false;
                let count = records.len();
                state.session.replace_records(records, Some(path.display().to_string()));
                selection::reset_selection(state);
                state.log(format!("[✓] Loaded {} records from {}", count, path.display()));
                state.log(format!("    {} photo-name filters", state.session.prefixes.len()));
                state.set_status(format!("Loaded {} records", count));
            }
            AsyncMessage::WorkbookLoaded { path, result: Err(e) } => {
                state.loading = false;
                log::error!("Error loading Excel file {}: {}", path.display(), e);
                state.log(format!("[✗] Failed to load {}: {}", path.display(), e));
                state.show_alert("Error Loading Excel", format!("Error loading Excel file: {}", e));
            }
            AsyncMessage::ImageLoaded { path, result } => {
                if state.map.requested.as_deref() != Some(path.as_path()) {
                    log::debug!("Dropping stale image {}", path.display());
                    continue;
                }
                state.map.requested = None;
                match result {
                    Ok(image) => on_image_loaded(ctx, state, path, image),
                    Err(e) => {
                        log::error!("Failed to load image {}: {}", path.display(), e);
                        state.log(format!("[✗] Failed to load image: {}", e));
                        state.map.texture = None;
                        state.map.current = None;
                        state.map.pending = None;
                        state.map.transform = None;
                        state.map.file_label = "Failed to load image".into();
                    }
                }
            }
            AsyncMessage::GeorefDone(Ok(report)) => {
                state.georeferencing = false;
                log_georef_report(state, &report);
                state.show_alert(
                    "Georeferencing Complete",
                    format!("Results saved to:\n{}", report.output.display()),
                );
            }
            AsyncMessage::GeorefDone(Err(e)) => {
                state.georeferencing = false;
                log::error!("Georeferencing failed: {}", e);
                state.log(format!("[✗] Georeferencing failed: {}", e));
                state.show_alert("Georeferencing Failed", e);
            }
        }
    }
}

fn on_file_selected(state: &mut AppState, tx: Sender<AsyncMessage>, purpose: DialogPurpose, path: &Path) {
    match purpose {
        DialogPurpose::LoadExcel => file_ops::load_workbook(state, tx, path),
        DialogPurpose::ImageDirectory => set_image_dir(state, path.to_path_buf()),
        DialogPurpose::Georeference => file_ops::georeference(state, tx, path),
        DialogPurpose::ExportCsv => file_ops::export(state, path),
    }
}

fn set_image_dir(state: &mut AppState, dir: PathBuf) {
    let count = state.session.set_image_dir(&dir);
    state.log(format!("[✓] Image directory: {} ({} filters)", dir.display(), count));
    state.set_status(format!("Image directory set to {}", dir.display()));
}

fn on_image_loaded(ctx: &egui::Context, state: &mut AppState, path: PathBuf, image: MapImage) {
    let size = [image.width as usize, image.height as usize];
    let color = egui::ColorImage::from_rgba_unmultiplied(size, &image.rgba);
    let texture = ctx.load_texture(image.file_name(), color, egui::TextureOptions::LINEAR);

    let map = &mut state.map;
    map.texture = Some(texture);
    map.image_size = egui::vec2(image.width as f32, image.height as f32);
    map.file_label = image.file_name();
    map.current = Some(path);
    map.viewport.reset();
    map.markers = Default::default();
    if let Some(pending) = map.pending.take() {
        map.transform = transform_for_photo(&state.session.table, &pending.photo);
        map.photo = Some(pending.photo);
        map.markers = pending.markers;
    }
    log::info!("Showing {} ({}x{})", image.file_name(), image.width, image.height);
}

fn log_georef_report(state: &mut AppState, report: &GeorefReport) {
    state.log(format!(
        "[✓] Georeferenced {} of {} rows across {} images",
        report.located_rows,
        report.total_rows,
        report.transforms.len()
    ));
    for photo in &report.skipped {
        state.log(format!("[!] Not enough known coordinates for {}", photo));
    }
    state.log(format!("[✓] Saved to {}", report.output.display()));
}

/// Process a console command
pub fn process_command(ctx: &egui::Context, state: &mut AppState, tx: Sender<AsyncMessage>, input: &str) {
    match parse_command(input) {
        // Slow commands run off the UI thread
        AppCommand::Load(path) => file_ops::load_workbook(state, tx, Path::new(&path)),
        AppCommand::Georef(path) => file_ops::georeference(state, tx, Path::new(&path)),
        cmd => {
            let output = execute(&mut state.session, cmd);
            for line in output.lines {
                state.log(line);
            }
            apply_effect(ctx, state, tx, output.effect);
        }
    }
}

fn apply_effect(ctx: &egui::Context, state: &mut AppState, tx: Sender<AsyncMessage>, effect: CommandEffect) {
    match effect {
        CommandEffect::None => {}
        CommandEffect::DataReloaded => selection::reset_selection(state),
        CommandEffect::ImagesChanged => {
            let summary = state.session.filter_summary();
            state.set_status(summary);
        }
        CommandEffect::Filtered(prefix) => selection::show_prefix(state, tx, &prefix),
        CommandEffect::Select(row) => {
            state.scroll_to_row = state.session.table.view_position(row);
            selection::select_row(state, tx, row);
        }
        CommandEffect::Clear => {
            state.clear_logs();
            state.log("[*] Console cleared");
        }
        CommandEffect::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::sample_records;
    use crate::ui::gui::state::PendingImage;
    use std::sync::mpsc;

    fn image(path: &Path) -> MapImage {
        MapImage {
            path: path.to_path_buf(),
            width: 2,
            height: 2,
            rgba: vec![255; 16],
        }
    }

    #[test]
    fn test_stale_image_is_dropped() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();
        let (tx, rx) = mpsc::channel();
        state.map.requested = Some(PathBuf::from("/maps/3. 만대리.png"));

        let stale = PathBuf::from("/maps/1. 오호.png");
        tx.send(AsyncMessage::ImageLoaded {
            result: Ok(image(&stale)),
            path: stale,
        })
        .unwrap();
        process_messages(&ctx, &mut state, &rx, &tx);

        assert!(!state.map.has_image());
        assert!(state.map.current.is_none());
        assert_eq!(state.map.requested.as_deref(), Some(Path::new("/maps/3. 만대리.png")));
        assert_eq!(state.map.file_label, "No image loaded");
    }

    #[test]
    fn test_requested_image_applies_pending_selection() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();
        let (tx, rx) = mpsc::channel();
        let path = PathBuf::from("/maps/1. 오호.png");
        let markers = state.session.table.markers_for_selection(3);
        state.map.requested = Some(path.clone());
        state.map.pending = Some(PendingImage {
            photo: "1. 오호".into(),
            markers: markers.clone(),
        });
        state.map.viewport.scale = 4.0;

        tx.send(AsyncMessage::ImageLoaded {
            result: Ok(image(&path)),
            path: path.clone(),
        })
        .unwrap();
        process_messages(&ctx, &mut state, &rx, &tx);

        assert!(state.map.has_image());
        assert_eq!(state.map.current, Some(path));
        assert!(state.map.requested.is_none());
        assert!(state.map.pending.is_none());
        assert_eq!(state.map.photo.as_deref(), Some("1. 오호"));
        assert_eq!(state.map.markers, markers);
        assert_eq!(state.map.viewport.scale, 1.0);
        assert_eq!(state.map.file_label, "1. 오호.png");
    }

    #[test]
    fn test_failed_image_clears_map() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();
        let (tx, rx) = mpsc::channel();
        let path = PathBuf::from("/maps/broken.png");
        state.map.requested = Some(path.clone());
        state.map.current = Some(PathBuf::from("/maps/old.png"));

        tx.send(AsyncMessage::ImageLoaded {
            path,
            result: Err("bad png".into()),
        })
        .unwrap();
        process_messages(&ctx, &mut state, &rx, &tx);

        assert!(state.map.requested.is_none());
        assert!(state.map.current.is_none());
        assert_eq!(state.map.file_label, "Failed to load image");
    }

    #[test]
    fn test_failed_workbook_keeps_previous_records() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();
        let (tx, rx) = mpsc::channel();
        state.loading = true;

        tx.send(AsyncMessage::WorkbookLoaded {
            path: PathBuf::from("/data/broken.xlsx"),
            result: Err("not a workbook".into()),
        })
        .unwrap();
        process_messages(&ctx, &mut state, &rx, &tx);

        assert!(!state.loading);
        assert_eq!(state.session.table.len(), 6);
        assert_eq!(state.session.source_label(), "sample data");
        let alert = state.alert.as_ref().unwrap();
        assert_eq!(alert.title, "Error Loading Excel");
        assert_eq!(alert.message, "Error loading Excel file: not a workbook");
    }

    #[test]
    fn test_loaded_workbook_replaces_records() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();
        let (tx, rx) = mpsc::channel();
        state.loading = true;
        state.selected_row = Some(2);

        let records = sample_records().into_iter().take(2).collect();
        tx.send(AsyncMessage::WorkbookLoaded {
            path: PathBuf::from("/data/dikes.xlsx"),
            result: Ok(records),
        })
        .unwrap();
        process_messages(&ctx, &mut state, &rx, &tx);

        assert!(!state.loading);
        assert_eq!(state.session.table.len(), 2);
        assert_eq!(state.session.source_label(), "dikes.xlsx");
        assert!(state.selected_row.is_none());
        assert_eq!(state.status_message(), Some("Loaded 2 records"));
    }
}
