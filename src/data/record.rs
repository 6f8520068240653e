//! Dike record model
//!
//! One record per spreadsheet row. Cell values keep the type the workbook
//! gave them, because integer and float coordinates mean different units.

use std::cmp::Ordering;
use std::fmt;

/// Pixels per centimetre at 96 DPI (viewer marker placement)
pub const PIXELS_PER_CM: f64 = 96.0 / 2.54;

/// Data columns in display order (the sequence column `#` is not stored)
pub const COLUMN_HEADERS: [&str; 12] = [
    "지역",
    "기호",
    "지층",
    "대표암상",
    "시대",
    "각도",
    "거리 (km)",
    "주소",
    "색",
    "좌표 X",
    "좌표 Y",
    "사진 이름",
];

/// Header of the generated sequence column
pub const SEQUENCE_HEADER: &str = "#";

/// Optional georeference columns
pub const LAT_HEADER: &str = "코드1 좌표 Lat";
pub const LNG_HEADER: &str = "코드 1 좌표 Lng";

pub const COL_X: usize = 9;
pub const COL_Y: usize = 10;
pub const COL_PHOTO: usize = 11;

/// A single typed spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Integer(i64),
    Float(f64),
}

impl CellValue {
    /// Numeric value, if the cell holds one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(f) if f.is_finite() => Some(*f),
            _ => None,
        }
    }

    /// Numeric value, also parsing numeric-looking text
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            other => other.as_f64(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Integer(_) | CellValue::Float(_) => 1,
            CellValue::Text(_) => 2,
        }
    }

    /// Total order used by table sorting: empty < numbers < text
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => match (self, other) {
                (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" on integral floats
            CellValue::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Integer(v)
    }
}

/// A record position on its printed map sheet, in centimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCoordinate {
    pub x: f64,
    pub y: f64,
}

impl MapCoordinate {
    /// Position in whole image pixels at 96 DPI
    pub fn to_pixels(&self) -> (f32, f32) {
        (
            (self.x * PIXELS_PER_CM).trunc() as f32,
            (self.y * PIXELS_PER_CM).trunc() as f32,
        )
    }
}

/// One dike observation
#[derive(Debug, Clone, PartialEq)]
pub struct DikeRecord {
    /// Values for [`COLUMN_HEADERS`], in the same order
    pub cells: Vec<CellValue>,
    /// Known latitude (WGS84), when the workbook carries one
    pub lat: Option<f64>,
    /// Known longitude (WGS84)
    pub lng: Option<f64>,
}

impl DikeRecord {
    pub fn new(cells: Vec<CellValue>) -> Self {
        let mut cells = cells;
        cells.resize(COLUMN_HEADERS.len(), CellValue::Empty);
        Self {
            cells,
            lat: None,
            lng: None,
        }
    }

    pub fn cell(&self, column: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    pub fn region(&self) -> String {
        self.cell(0).to_string()
    }

    /// Photo name used to look up the map image
    pub fn photo_name(&self) -> String {
        self.cell(COL_PHOTO).to_string()
    }

    /// Map position, or `None` if either coordinate is not numeric.
    /// Integer cells are centimetres too; only the georeferencing converter
    /// reads whole-number columns as pixels.
    pub fn map_coordinate(&self) -> Option<MapCoordinate> {
        let x = self.cell(COL_X).coerce_f64()?;
        let y = self.cell(COL_Y).coerce_f64()?;
        Some(MapCoordinate { x, y })
    }

    /// Known WGS84 position as (lat, lng)
    pub fn lat_lng(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lng?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_xy(x: CellValue, y: CellValue) -> DikeRecord {
        let mut cells = vec![CellValue::Empty; COLUMN_HEADERS.len()];
        cells[COL_X] = x;
        cells[COL_Y] = y;
        DikeRecord::new(cells)
    }

    #[test]
    fn test_float_coordinates_are_centimeters() {
        let rec = record_with_xy(30.62.into(), 12.49.into());
        let coord = rec.map_coordinate().unwrap();
        let (px, py) = coord.to_pixels();
        assert_eq!(px, (30.62 * PIXELS_PER_CM).trunc() as f32);
        assert_eq!(py, 472.0);
    }

    #[test]
    fn test_integer_coordinates_are_centimeters_too() {
        let rec = record_with_xy(CellValue::Integer(17), CellValue::Integer(12));
        assert_eq!(rec.map_coordinate().unwrap().to_pixels(), (642.0, 453.0));

        let rec = record_with_xy(CellValue::Integer(10), 2.5.into());
        assert_eq!(rec.map_coordinate().unwrap().to_pixels(), (377.0, 94.0));
    }

    #[test]
    fn test_non_numeric_coordinates() {
        let rec = record_with_xy("n/a".into(), 3.0.into());
        assert!(rec.map_coordinate().is_none());

        let rec = record_with_xy(CellValue::Empty, 3.0.into());
        assert!(rec.map_coordinate().is_none());
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(CellValue::Float(17.0).to_string(), "17.0");
        assert_eq!(CellValue::Float(-10.8).to_string(), "-10.8");
        assert_eq!(CellValue::Integer(17).to_string(), "17");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_sort_order() {
        let mut values = vec![
            CellValue::Text("b".into()),
            CellValue::Float(2.5),
            CellValue::Empty,
            CellValue::Integer(1),
            CellValue::Text("a".into()),
        ];
        values.sort_by(|a, b| a.sort_cmp(b));
        assert_eq!(
            values,
            vec![
                CellValue::Empty,
                CellValue::Integer(1),
                CellValue::Float(2.5),
                CellValue::Text("a".into()),
                CellValue::Text("b".into()),
            ]
        );
    }
}
