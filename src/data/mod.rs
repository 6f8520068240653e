//! Dike data: record model, workbook ingestion, table view and export.

pub mod excel;
pub mod export;
pub mod record;
pub mod sample;
pub mod table;

pub use excel::{find_data_workbook, load_records, ExcelError, Sheet};
pub use export::{export_csv, ExportError};
pub use record::{CellValue, DikeRecord, MapCoordinate, COLUMN_HEADERS};
pub use table::{DikeTable, Marker, MarkerSet, SortColumn, SortOrder};
