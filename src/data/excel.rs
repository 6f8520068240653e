//! Excel workbook ingestion
//!
//! Reads the first worksheet of an `.xlsx`/`.xls` file with calamine,
//! treating the first row as headers, and maps it onto [`DikeRecord`]s.

use calamine::{open_workbook_auto, Data, Reader};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::record::{CellValue, DikeRecord, COLUMN_HEADERS, LAT_HEADER, LNG_HEADER};

/// Workbook the field team ships in the data directory
pub const PREFERRED_WORKBOOK: &str = "석영맥(통합)v1.xlsx";

/// Columns that never belong in the table
const IGNORED_COLUMNS: &[&str] = &["200 아래"];

/// Workbook errors
#[derive(Error, Debug)]
pub enum ExcelError {
    #[error("Failed to open workbook {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: calamine::Error,
    },

    #[error("Workbook {0} has no worksheets")]
    NoSheet(String),

    #[error("Failed to read worksheet: {0}")]
    Read(#[from] calamine::Error),

    #[error("Worksheet is empty (no header row)")]
    Empty,
}

/// The first worksheet as headers plus typed rows
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Read the first worksheet for display: typed columns, junk columns removed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExcelError> {
        let mut sheet = Self::read(path)?;
        sheet.drop_unnamed_columns();
        Ok(sheet)
    }

    /// Read the first worksheet keeping every column, blank headers included
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ExcelError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let mut workbook = open_workbook_auto(&path).map_err(|source| ExcelError::Open {
            path: path_str.clone(),
            source,
        })?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ExcelError::NoSheet(path_str.clone()))??;

        let mut rows = range.rows();
        let header_row = rows.next().ok_or(ExcelError::Empty)?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|h| h.to_string().trim().to_string())
            .collect();
        let body: Vec<Vec<CellValue>> = rows
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();

        let mut sheet = Self::from_parts(headers, body);
        sheet.infer_column_types();
        log::debug!(
            "Read {} rows x {} columns from {}",
            sheet.rows.len(),
            sheet.headers.len(),
            path_str
        );
        Ok(sheet)
    }

    /// Build a sheet, padding short rows to the header width
    pub fn from_parts(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, CellValue::Empty);
                r
            })
            .collect();
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Remove columns without a header and known junk columns
    pub fn drop_unnamed_columns(&mut self) {
        let keep: Vec<bool> = self
            .headers
            .iter()
            .map(|h| !h.is_empty() && !h.starts_with("Unnamed") && !IGNORED_COLUMNS.contains(&h.as_str()))
            .collect();
        if keep.iter().all(|k| *k) {
            return;
        }

        retain_by_mask(&mut self.headers, &keep);
        for row in &mut self.rows {
            retain_by_mask(row, &keep);
        }
    }

    /// Column-level numeric typing.
    ///
    /// A column of only numbers with no gaps becomes integers when every value
    /// is integral, floats otherwise. A numeric column with gaps stays float.
    /// Mixed text columns keep per-cell types, with integral floats as integers.
    pub fn infer_column_types(&mut self) {
        for col in 0..self.headers.len() {
            let mut has_text = false;
            let mut has_empty = false;
            let mut all_integral = true;
            for row in &self.rows {
                match &row[col] {
                    CellValue::Text(s) if !s.is_empty() => has_text = true,
                    CellValue::Float(f) => all_integral &= f.fract() == 0.0,
                    CellValue::Integer(_) => {}
                    _ => has_empty = true,
                }
            }

            for row in &mut self.rows {
                let cell = &mut row[col];
                let as_int = if has_text {
                    true
                } else {
                    all_integral && !has_empty
                };
                *cell = match std::mem::take(cell) {
                    CellValue::Float(f) if as_int && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        CellValue::Integer(f as i64)
                    }
                    CellValue::Integer(i) if !as_int => CellValue::Float(i as f64),
                    other => other,
                };
            }
        }
    }
}

fn retain_by_mask<T>(values: &mut Vec<T>, keep: &[bool]) {
    let mut i = 0;
    values.retain(|_| {
        let k = keep.get(i).copied().unwrap_or(true);
        i += 1;
        k
    });
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Text(if *b { "True".into() } else { "False".into() }),
        other => CellValue::Text(other.to_string()),
    }
}

/// Map a sheet onto dike records. Missing columns become empty cells.
pub fn records_from_sheet(sheet: &Sheet) -> Vec<DikeRecord> {
    let indices: Vec<Option<usize>> = COLUMN_HEADERS
        .iter()
        .map(|h| sheet.column_index(h))
        .collect();

    let missing: Vec<&str> = COLUMN_HEADERS
        .iter()
        .zip(&indices)
        .filter(|(_, idx)| idx.is_none())
        .map(|(h, _)| *h)
        .collect();
    if !missing.is_empty() {
        log::warn!("Missing columns in workbook (left empty): {:?}", missing);
    }

    let lat_col = sheet.column_index(LAT_HEADER);
    let lng_col = sheet.column_index(LNG_HEADER);

    sheet
        .rows
        .iter()
        .map(|row| {
            let cells = indices
                .iter()
                .map(|idx| idx.map(|i| row[i].clone()).unwrap_or_default())
                .collect();
            let mut record = DikeRecord::new(cells);
            record.lat = lat_col.and_then(|i| row[i].coerce_f64());
            record.lng = lng_col.and_then(|i| row[i].coerce_f64());
            record
        })
        .collect()
}

/// Load dike records from a workbook
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<DikeRecord>, ExcelError> {
    log::info!("Loading workbook {}", path.as_ref().display());
    let sheet = Sheet::from_file(&path)?;
    let records = records_from_sheet(&sheet);
    log::info!("Loaded {} records", records.len());
    Ok(records)
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "xlsx" | "xls"))
        .unwrap_or(false)
}

/// Find the workbook to open from a data directory: the preferred file if
/// present, otherwise the first workbook by name.
pub fn find_data_workbook(dir: &Path) -> Option<PathBuf> {
    let preferred = dir.join(PREFERRED_WORKBOOK);
    if preferred.is_file() {
        log::debug!("Found preferred workbook {}", preferred.display());
        return Some(preferred);
    }

    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_workbook(p))
        .collect();
    candidates.sort();
    let found = candidates.into_iter().next();
    match &found {
        Some(p) => log::debug!("Using fallback workbook {}", p.display()),
        None => log::debug!("No workbooks in {}", dir.display()),
    }
    found
}
