//! Shared session state
//!
//! The loaded table and image directory, used by both the REPL and the GUI.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::ViewerConfig;
use crate::data::{load_records, DikeRecord, DikeTable, ExcelError};
use crate::imagery::ImageDirectory;

/// Data shared between CLI and GUI modes
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Records with the current filter/sort view
    pub table: DikeTable,
    /// Where map images are looked up
    pub images: ImageDirectory,
    /// Filter-button prefix -> first matching image
    pub prefixes: BTreeMap<String, PathBuf>,
}

impl Session {
    /// Sample data, no image directory
    pub fn new() -> Self {
        Self {
            table: DikeTable::sample(),
            ..Default::default()
        }
    }

    /// Startup session: the configured workbook if it loads, otherwise samples
    pub fn from_config(config: &ViewerConfig) -> Self {
        let mut session = Self::new();
        session.images.set_path(config.image_dir());

        match config.workbook() {
            Some(path) => {
                if let Err(e) = session.load_workbook(&path) {
                    log::error!("Error loading Excel file {}: {}", path.display(), e);
                    log::info!("Using sample data");
                }
            }
            None => log::info!("No workbook found, using sample data"),
        }
        session.rebuild_prefixes();
        session
    }

    /// Load a workbook, replacing the current records.
    /// On failure the previous records are kept.
    pub fn load_workbook<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, ExcelError> {
        let path = path.as_ref();
        let records = load_records(path)?;
        let count = records.len();
        self.replace_records(records, Some(path.display().to_string()));
        Ok(count)
    }

    /// Swap in already-loaded records (GUI background loads end up here)
    pub fn replace_records(&mut self, records: Vec<DikeRecord>, source: Option<String>) {
        self.table.replace_records(records, source);
        self.rebuild_prefixes();
    }

    /// Point at a new image directory and rebuild the filter prefixes
    pub fn set_image_dir<P: Into<PathBuf>>(&mut self, dir: P) -> usize {
        self.images.set_path(dir);
        self.rebuild_prefixes();
        self.prefixes.len()
    }

    pub fn rebuild_prefixes(&mut self) {
        self.prefixes = if self.images.is_valid() {
            self.images.prefix_images(&self.table.photo_names())
        } else {
            BTreeMap::new()
        };
    }

    /// "Showing N of M records for P" / "Showing all M records"
    pub fn filter_summary(&self) -> String {
        if self.table.filter().is_empty() {
            format!("Showing all {} records", self.table.len())
        } else {
            format!(
                "Showing {} of {} records for {}",
                self.table.visible_len(),
                self.table.len(),
                self.table.filter()
            )
        }
    }

    /// Short label for the data source
    pub fn source_label(&self) -> String {
        match self.table.source() {
            Some(src) => Path::new(src)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| src.to_string()),
            None => "sample data".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_new_session_uses_samples() {
        let session = Session::new();
        assert_eq!(session.table.len(), 6);
        assert_eq!(session.source_label(), "sample data");
        assert!(session.prefixes.is_empty());
    }

    #[test]
    fn test_filter_summary() {
        let mut session = Session::new();
        assert_eq!(session.filter_summary(), "Showing all 6 records");
        session.table.set_filter("1. 오호");
        assert_eq!(session.filter_summary(), "Showing 1 of 6 records for 1. 오호");
    }

    #[test]
    fn test_set_image_dir_builds_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1. 오호 지질도.png"), b"").unwrap();
        fs::write(dir.path().join("3. 만대리.jpg"), b"").unwrap();

        let mut session = Session::new();
        assert_eq!(session.set_image_dir(dir.path()), 2);
        assert!(session.prefixes.contains_key("1. 오호"));
        assert!(session.prefixes.contains_key("3. 만대리"));
    }

    #[test]
    fn test_failed_load_keeps_records() {
        let mut session = Session::new();
        assert!(session.load_workbook("/nonexistent/data.xlsx").is_err());
        assert_eq!(session.table.len(), 6);
    }

    #[test]
    fn test_from_config_without_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig::resolve(Some(dir.path().into()), None, None, 0);
        let session = Session::from_config(&config);
        assert_eq!(session.table.len(), 6);
        assert_eq!(session.images.path(), Some(dir.path()));
    }
}
