//! File operations - dialogs, workbook and image loading, georeferencing.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use crate::data::{export_csv, load_records};
use crate::geodesy::georeference_workbook;
use crate::imagery::MapImage;
use crate::ui::gui::messages::{AsyncMessage, DialogPurpose};
use crate::ui::gui::state::AppState;

/// Open a native dialog on a helper thread
pub fn open_dialog(tx: Sender<AsyncMessage>, purpose: DialogPurpose, start_dir: Option<PathBuf>) {
    std::thread::spawn(move || {
        let mut dialog = rfd::FileDialog::new();
        if let Some(dir) = start_dir.filter(|d| d.is_dir()) {
            dialog = dialog.set_directory(dir);
        }
        let path = match purpose {
            DialogPurpose::LoadExcel => dialog
                .set_title("Select Excel File")
                .add_filter("Excel Files", &["xlsx", "xls"])
                .pick_file(),
            DialogPurpose::Georeference => dialog
                .set_title("Select Excel File to Georeference")
                .add_filter("Excel Files", &["xlsx", "xls"])
                .pick_file(),
            DialogPurpose::ImageDirectory => dialog.set_title("Select Image Directory").pick_folder(),
            DialogPurpose::ExportCsv => dialog
                .set_title("Export Visible Rows")
                .add_filter("CSV", &["csv"])
                .set_file_name("dikes.csv")
                .save_file(),
        };
        let _ = tx.send(AsyncMessage::FileSelected { purpose, path });
    });
}

/// Read a workbook on a helper thread
pub fn load_workbook(state: &mut AppState, tx: Sender<AsyncMessage>, path: &Path) {
    if state.loading {
        state.log("[!] A workbook is already loading");
        return;
    }
    state.loading = true;
    state.log(format!("[*] Loading {}...", path.display()));

    let path = path.to_path_buf();
    std::thread::spawn(move || {
        let result = load_records(&path).map_err(|e| e.to_string());
        let _ = tx.send(AsyncMessage::WorkbookLoaded { path, result });
    });
}

/// Decode a map image on a helper thread
pub fn load_image(state: &mut AppState, tx: Sender<AsyncMessage>, path: &Path) {
    if state.map.requested.as_deref() == Some(path) {
        return;
    }
    state.map.requested = Some(path.to_path_buf());
    log::debug!("Loading image {}", path.display());

    let path = path.to_path_buf();
    std::thread::spawn(move || {
        let result = MapImage::from_file(&path).map_err(|e| e.to_string());
        let _ = tx.send(AsyncMessage::ImageLoaded { path, result });
    });
}

/// Georeference a workbook on a helper thread
pub fn georeference(state: &mut AppState, tx: Sender<AsyncMessage>, path: &Path) {
    if state.georeferencing {
        state.log("[!] Georeferencing is already running");
        return;
    }
    state.georeferencing = true;
    state.log(format!("[*] Georeferencing {}...", path.display()));

    let path = path.to_path_buf();
    std::thread::spawn(move || {
        let result = georeference_workbook(&path).map_err(|e| e.to_string());
        let _ = tx.send(AsyncMessage::GeorefDone(result));
    });
}

/// Write the visible rows to CSV
pub fn export(state: &mut AppState, path: &Path) {
    match export_csv(&state.session.table, path) {
        Ok(n) => {
            state.log(format!("[✓] Exported {} rows to {}", n, path.display()));
            state.set_status(format!("Exported {} rows", n));
        }
        Err(e) => {
            log::error!("Export failed: {}", e);
            state.log(format!("[✗] Export failed: {}", e));
            state.show_alert("Export Failed", e.to_string());
        }
    }
}
