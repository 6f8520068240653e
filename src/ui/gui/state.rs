//! Shared application state for the DikeFinder GUI.
//!
//! Contains all state that needs to be shared across UI panels.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;
use log::LevelFilter;

use crate::app::Session;
use crate::config::ViewerConfig;
use crate::data::MarkerSet;
use crate::geodesy::{ImageTransform, Measurement};

use super::viewport::MapViewport;

/// How long a status bar message stays visible
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// View adjustment applied once the map panel knows its size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRequest {
    /// Fit the whole image
    Fit,
    /// Zoom to 200% and center on the primary marker
    CenterPrimary,
}

/// Selection waiting for its image to finish decoding
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub photo: String,
    pub markers: MarkerSet,
}

/// Map panel state
#[derive(Default)]
pub struct MapState {
    /// Uploaded image texture
    pub texture: Option<egui::TextureHandle>,
    /// Image size in pixels
    pub image_size: egui::Vec2,
    /// Path of the image currently shown
    pub current: Option<PathBuf>,
    /// Path of the image being decoded
    pub requested: Option<PathBuf>,
    /// Photo name the current image belongs to
    pub photo: Option<String>,
    /// Label above the map ("No image loaded", file name or error)
    pub file_label: String,
    pub viewport: MapViewport,
    pub markers: MarkerSet,
    /// Photo and markers to show once the requested image arrives
    pub pending: Option<PendingImage>,
    pub view_request: Option<ViewRequest>,
    /// Pixel -> lat/lng fit for the current image, when enough rows carry lat/lng
    pub transform: Option<ImageTransform>,
}

impl MapState {
    pub fn new() -> Self {
        Self {
            file_label: "No image loaded".into(),
            ..Default::default()
        }
    }

    pub fn has_image(&self) -> bool {
        self.texture.is_some()
    }
}

/// Two-click distance measurement on the map
#[derive(Debug, Default, Clone)]
pub struct MeasureState {
    pub active: bool,
    /// First clicked point as (lat, lng)
    pub first: Option<(f64, f64)>,
    pub result: Option<Measurement>,
}

impl MeasureState {
    pub fn toggle(&mut self) {
        self.active = !self.active;
        self.first = None;
        self.result = None;
    }
}

/// Modal message box
#[derive(Debug, Clone)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// Main application state container
///
/// This struct holds all shared state that panels need to read/modify.
pub struct AppState {
    /// Records, image directory and filter prefixes
    pub session: Session,

    /// Selected source row
    pub selected_row: Option<usize>,

    /// Visible position the table should scroll to on the next frame
    pub scroll_to_row: Option<usize>,

    pub map: MapState,

    /// Zoom to 200% and center on the clicked row instead of fitting
    pub center_on_select: bool,

    /// Debug logging toggle
    pub verbose: bool,

    /// Log level chosen at startup, restored when verbose is switched off
    pub base_log_level: LevelFilter,

    /// Log buffer for the output console
    pub log_buffer: Vec<String>,

    /// Current command input in the integrated console
    pub cli_input: String,

    pub show_console: bool,

    /// Temporary status bar message and its expiry
    pub status: Option<(String, Instant)>,

    pub alert: Option<Alert>,

    pub measure: MeasureState,

    /// Workbook load in progress
    pub loading: bool,

    /// Georeferencing in progress
    pub georeferencing: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Session::new(), &ViewerConfig::default())
    }
}

impl AppState {
    pub fn new(session: Session, config: &ViewerConfig) -> Self {
        let mut state = Self {
            session,
            selected_row: None,
            scroll_to_row: None,
            map: MapState::new(),
            center_on_select: config.center_on_select,
            verbose: false,
            base_log_level: config.log_level(),
            log_buffer: vec![
                "==============================================================".into(),
                "  DikeFinder - Geological Dike Viewer".into(),
                "==============================================================".into(),
                "".into(),
            ],
            cli_input: String::new(),
            show_console: false,
            status: None,
            alert: None,
            measure: MeasureState::default(),
            loading: false,
            georeferencing: false,
        };
        let ready = format!(
            "[*] Ready. {} records from {}.",
            state.session.table.len(),
            state.session.source_label()
        );
        state.log(ready);
        state
    }

    /// Add a log message to the output buffer
    pub fn log(&mut self, message: impl Into<String>) {
        self.log_buffer.push(message.into());
    }

    /// Clear the log buffer
    pub fn clear_logs(&mut self) {
        self.log_buffer.clear();
    }

    /// Show a message in the status bar for a few seconds
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now() + STATUS_TIMEOUT));
    }

    /// Current status message, if not yet expired
    pub fn status_message(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|(_, until)| Instant::now() < *until)
            .map(|(msg, _)| msg.as_str())
    }

    pub fn show_alert(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.alert = Some(Alert {
            title: title.into(),
            message: message.into(),
        });
    }

    /// Switch debug logging on or off at runtime
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
        let level = if verbose {
            LevelFilter::Debug.max(self.base_log_level)
        } else {
            self.base_log_level
        };
        log::set_max_level(level);
        log::info!("Verbose logging {}", if verbose { "enabled" } else { "disabled" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_expires() {
        let mut state = AppState::default();
        assert!(state.status_message().is_none());

        state.set_status("Loaded");
        assert_eq!(state.status_message(), Some("Loaded"));

        state.status = Some(("Old".into(), Instant::now() - Duration::from_secs(1)));
        assert!(state.status_message().is_none());
    }

    #[test]
    fn test_measure_toggle_resets_points() {
        let mut m = MeasureState {
            active: false,
            first: Some((37.0, 127.0)),
            result: None,
        };
        m.toggle();
        assert!(m.active);
        assert!(m.first.is_none());
    }

    #[test]
    fn test_ready_message() {
        let state = AppState::default();
        assert_eq!(
            state.log_buffer.last().map(String::as_str),
            Some("[*] Ready. 6 records from sample data.")
        );
        assert_eq!(state.map.file_label, "No image loaded");
    }
}
