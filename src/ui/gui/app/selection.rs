//! Row selection and filter buttons - which image to show and which markers to draw.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use crate::data::MarkerSet;
use crate::geodesy::transform_for_photo;
use crate::ui::gui::messages::AsyncMessage;
use crate::ui::gui::state::{AppState, PendingImage, ViewRequest};

use super::file_ops;

/// Show the image for a table row with all markers for that photo
pub fn select_row(state: &mut AppState, tx: Sender<AsyncMessage>, source_row: usize) {
    let Some(record) = state.session.table.record(source_row) else {
        return;
    };
    let photo = record.photo_name();
    let seq = state.session.table.sequence_number(source_row);
    state.selected_row = Some(source_row);
    log::debug!("Selected row #{} (photo '{}')", seq, photo);

    let markers = state.session.table.markers_for_selection(source_row);
    let request = if state.center_on_select {
        ViewRequest::CenterPrimary
    } else {
        ViewRequest::Fit
    };

    match state.session.images.find_image(&photo) {
        Some(path) => {
            let status = format!("Row #{} - {}", seq, photo);
            show_image(state, tx, &path, photo, markers, request);
            state.set_status(status);
        }
        None if state.session.images.path().is_some() => {
            log::warn!("Could not find an image file containing '{}'", photo);
            state.log(format!("[!] Could not find an image file containing '{}'", photo));
            state.show_alert(
                "Image Not Found",
                format!(
                    "Could not find an image file containing '{}' in the selected directory.",
                    photo
                ),
            );
        }
        None => {
            state.set_status("Set an image directory to view maps");
        }
    }
}

/// Filter button: filter the table, then show the prefix image with every visible row
pub fn show_prefix(state: &mut AppState, tx: Sender<AsyncMessage>, prefix: &str) {
    state.session.table.set_filter(prefix);
    state.selected_row = None;
    let summary = state.session.filter_summary();
    state.set_status(summary);

    if prefix.is_empty() {
        state.map.markers = MarkerSet::default();
        return;
    }
    let path: Option<PathBuf> = state
        .session
        .prefixes
        .get(prefix)
        .cloned()
        .or_else(|| state.session.images.find_image(prefix));
    match path {
        Some(path) => {
            let markers = state.session.table.markers_for_visible();
            show_image(state, tx, &path, prefix.to_string(), markers, ViewRequest::Fit);
        }
        None => log::debug!("No image for prefix {}", prefix),
    }
}

/// New data invalidates the selection and the markers
pub fn reset_selection(state: &mut AppState) {
    state.selected_row = None;
    state.map.markers = MarkerSet::default();
    state.map.pending = None;
    state.map.transform = state
        .map
        .photo
        .as_deref()
        .and_then(|p| transform_for_photo(&state.session.table, p));
}

fn show_image(
    state: &mut AppState,
    tx: Sender<AsyncMessage>,
    path: &Path,
    photo: String,
    markers: MarkerSet,
    request: ViewRequest,
) {
    // Only move the view when there is something to look at
    state.map.view_request = (!markers.is_empty()).then_some(request);
    if state.map.current.as_deref() == Some(path) {
        // Drop any load still in flight for another image
        state.map.pending = None;
        state.map.requested = None;
        state.map.transform = transform_for_photo(&state.session.table, &photo);
        state.map.photo = Some(photo);
        state.map.markers = markers;
        return;
    }
    state.map.pending = Some(PendingImage { photo, markers });
    file_ops::load_image(state, tx, path);
}
