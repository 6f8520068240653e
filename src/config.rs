//! Viewer configuration
//!
//! Resolved once at startup from command-line flags. Nothing here is saved.

use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;

use crate::data::find_data_workbook;

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Directory searched for the data workbook
    pub data_dir: PathBuf,
    /// Directory holding map images (defaults to the data directory)
    pub image_dir: PathBuf,
    /// Explicit workbook, overrides the data directory search
    pub excel: Option<PathBuf>,
    /// Zoom to 200% and center on the clicked row instead of fitting
    pub center_on_select: bool,
    /// `-v` count
    pub verbosity: u8,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            image_dir: PathBuf::from(DEFAULT_DATA_DIR),
            excel: None,
            center_on_select: true,
            verbosity: 0,
        }
    }
}

impl ViewerConfig {
    pub fn resolve(
        data_dir: Option<PathBuf>,
        image_dir: Option<PathBuf>,
        excel: Option<PathBuf>,
        verbosity: u8,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let image_dir = image_dir.unwrap_or_else(|| data_dir.clone());
        Self {
            data_dir,
            image_dir,
            excel,
            verbosity,
            ..Default::default()
        }
    }

    /// Create the data directory if missing. Failure is logged, not fatal.
    pub fn ensure_data_dir(&self) -> bool {
        if self.data_dir.is_dir() {
            return true;
        }
        match fs::create_dir_all(&self.data_dir) {
            Ok(()) => {
                log::info!("Created data directory: {}", self.data_dir.display());
                true
            }
            Err(e) => {
                log::error!(
                    "Failed to create data directory {}: {}",
                    self.data_dir.display(),
                    e
                );
                false
            }
        }
    }

    /// Workbook to load at startup, if any
    pub fn workbook(&self) -> Option<PathBuf> {
        if let Some(path) = &self.excel {
            return Some(path.clone());
        }
        find_data_workbook(&self.data_dir)
    }

    pub fn log_level(&self) -> LevelFilter {
        level_for_verbosity(self.verbosity)
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }
}

/// `-v` count to log level: warn, info, debug, trace
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
