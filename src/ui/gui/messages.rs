//! Async message types for GUI communication.
//!
//! These messages are sent from background threads to the main UI thread.

use std::path::PathBuf;

use crate::data::DikeRecord;
use crate::geodesy::GeorefReport;
use crate::imagery::MapImage;

/// What a native file dialog was opened for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPurpose {
    /// Pick a workbook to load
    LoadExcel,
    /// Pick the map image directory
    ImageDirectory,
    /// Pick a workbook to georeference
    Georeference,
    /// Pick a CSV destination
    ExportCsv,
}

/// Message types for async operations between threads and UI
pub enum AsyncMessage {
    /// A dialog closed (None if cancelled)
    FileSelected {
        purpose: DialogPurpose,
        path: Option<PathBuf>,
    },

    /// Workbook was read (success or failure)
    WorkbookLoaded {
        path: PathBuf,
        result: Result<Vec<DikeRecord>, String>,
    },

    /// Map image was decoded (success or failure)
    ImageLoaded {
        path: PathBuf,
        result: Result<MapImage, String>,
    },

    /// Georeferencing finished
    GeorefDone(Result<GeorefReport, String>),
}
