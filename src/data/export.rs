//! CSV export of the visible table

use std::path::Path;
use thiserror::Error;

use super::record::{COLUMN_HEADERS, SEQUENCE_HEADER};
use super::table::DikeTable;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No data to export")]
    NoRows,

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write the visible rows (current filter and sort) as UTF-8 CSV.
///
/// Returns the number of data rows written.
pub fn export_csv<P: AsRef<Path>>(table: &DikeTable, path: P) -> Result<usize, ExportError> {
    if table.visible_len() == 0 {
        return Err(ExportError::NoRows);
    }

    let mut writer = csv::Writer::from_path(&path)?;
    let headers = std::iter::once(SEQUENCE_HEADER).chain(COLUMN_HEADERS.iter().copied());
    writer.write_record(headers)?;

    for pos in 0..table.visible_len() {
        let row: Vec<String> = (0..=COLUMN_HEADERS.len())
            .map(|col| table.display_cell(pos, col))
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;

    log::info!(
        "Exported {} rows to {}",
        table.visible_len(),
        path.as_ref().display()
    );
    Ok(table.visible_len())
}
