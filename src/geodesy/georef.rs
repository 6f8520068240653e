//! Georeferencing of scanned map sheets
//!
//! Each map image gets an independent axis-aligned transform from image
//! pixels to Web Mercator, fitted on the rows whose lat/lng are known:
//!
//!   X_3857 = a * x_px + b
//!   Y_3857 = c * (max_y - y_px) + d
//!
//! The y axis is flipped against the largest known pixel y so that "up" on
//! the image is north.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

use super::fit::LinearFit;
use super::mercator::{from_web_mercator, to_web_mercator};
use crate::data::excel::{ExcelError, Sheet};
use crate::data::table::DikeTable;
use crate::data::record::{CellValue, COLUMN_HEADERS, COL_PHOTO, COL_X, COL_Y, LAT_HEADER, LNG_HEADER};

/// Centimetres to inches, as used by the sheet digitisers
pub const CM_TO_INCH: f64 = 0.393701;
/// Screen resolution the pixel coordinates were measured at
pub const DPI: f64 = 96.0;

/// Columns appended to the output workbook, in order
pub const OUTPUT_COLUMNS: [&str; 7] = [
    "X_3857",
    "Y_3857",
    "Calculated_Lat",
    "Calculated_Lng",
    "Pixel_X",
    "Pixel_Y",
    "Pixel_Y_Flipped",
];

#[derive(Error, Debug)]
pub enum GeorefError {
    #[error(transparent)]
    Excel(#[from] ExcelError),

    #[error("Required column '{0}' not found")]
    MissingColumn(&'static str),

    #[error("Failed to write workbook: {0}")]
    Write(#[from] XlsxError),
}

/// A known control point: image pixel position and WGS84 location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub x_px: f64,
    pub y_px: f64,
    pub lat: f64,
    pub lng: f64,
}

/// Pixel -> Web Mercator transform for one map image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageTransform {
    pub max_y: f64,
    pub x_fit: LinearFit,
    pub y_fit: LinearFit,
}

impl ImageTransform {
    /// Fit a transform from at least two control points.
    /// Returns `None` when the points do not determine both axes.
    pub fn from_points(points: &[ControlPoint]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let max_y = points.iter().map(|p| p.y_px).fold(f64::NEG_INFINITY, f64::max);

        let mut xs = Vec::with_capacity(points.len());
        let mut ys = Vec::with_capacity(points.len());
        let mut mx = Vec::with_capacity(points.len());
        let mut my = Vec::with_capacity(points.len());
        for p in points {
            let (x3857, y3857) = to_web_mercator(p.lng, p.lat);
            xs.push(p.x_px);
            ys.push(max_y - p.y_px);
            mx.push(x3857);
            my.push(y3857);
        }

        Some(Self {
            max_y,
            x_fit: LinearFit::fit(&xs, &mx)?,
            y_fit: LinearFit::fit(&ys, &my)?,
        })
    }

    pub fn flip_y(&self, y_px: f64) -> f64 {
        self.max_y - y_px
    }

    /// Image pixel -> EPSG:3857 metres
    pub fn pixel_to_mercator(&self, x_px: f64, y_px: f64) -> (f64, f64) {
        (self.x_fit.apply(x_px), self.y_fit.apply(self.flip_y(y_px)))
    }

    /// Image pixel -> (lat, lng)
    pub fn pixel_to_lat_lng(&self, x_px: f64, y_px: f64) -> (f64, f64) {
        let (x, y) = self.pixel_to_mercator(x_px, y_px);
        let (lng, lat) = from_web_mercator(x, y);
        (lat, lng)
    }

    /// (lat, lng) -> image pixel
    pub fn lat_lng_to_pixel(&self, lat: f64, lng: f64) -> Option<(f64, f64)> {
        let (x, y) = to_web_mercator(lng, lat);
        let x_px = self.x_fit.invert(x)?;
        let y_flipped = self.y_fit.invert(y)?;
        Some((x_px, self.max_y - y_flipped))
    }
}

/// Fit a transform for one map image from the loaded table.
///
/// Uses the viewer's marker pixel positions so hover coordinates line up with
/// the drawn markers.
pub fn transform_for_photo(table: &DikeTable, photo_name: &str) -> Option<ImageTransform> {
    let points: Vec<ControlPoint> = table
        .records()
        .iter()
        .filter(|r| r.photo_name() == photo_name)
        .filter_map(|r| {
            let (x, y) = r.map_coordinate()?.to_pixels();
            let (lat, lng) = r.lat_lng()?;
            Some(ControlPoint {
                x_px: x as f64,
                y_px: y as f64,
                lat,
                lng,
            })
        })
        .collect();
    ImageTransform::from_points(&points)
}

/// Outcome of a workbook georeferencing run
#[derive(Debug, Clone)]
pub struct GeorefReport {
    pub output: PathBuf,
    pub transforms: BTreeMap<String, ImageTransform>,
    /// Photo names that had too few control points
    pub skipped: Vec<String>,
    /// Rows that received Web Mercator coordinates
    pub located_rows: usize,
    pub total_rows: usize,
}

/// `<dir>/<stem>_with_coordinates.xlsx`
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".into());
    input.with_file_name(format!("{}_with_coordinates.xlsx", stem))
}

/// Sheet pixel conversion: both columns float -> centimetres to pixels,
/// otherwise the values are already pixels.
fn to_pixels(x: f64, y: f64, centimeters: bool) -> (f64, f64) {
    if centimeters {
        (
            (x * CM_TO_INCH * DPI).round_ties_even(),
            (y * CM_TO_INCH * DPI).round_ties_even(),
        )
    } else {
        (x, y)
    }
}

fn is_integer_column(sheet: &Sheet, col: usize) -> bool {
    !sheet.rows.is_empty()
        && sheet
            .rows
            .iter()
            .all(|r| matches!(r[col], CellValue::Integer(_)))
}

/// Compute coordinates for every row of a sheet, in place.
///
/// Appends (or clears) the [`OUTPUT_COLUMNS`] and fills them where a
/// transform exists. Every other column is left as it was.
pub fn georeference_sheet(sheet: &mut Sheet) -> Result<GeorefReport, GeorefError> {
    let photo_col = sheet
        .column_index(COLUMN_HEADERS[COL_PHOTO])
        .ok_or(GeorefError::MissingColumn(COLUMN_HEADERS[COL_PHOTO]))?;
    let x_col = sheet
        .column_index(COLUMN_HEADERS[COL_X])
        .ok_or(GeorefError::MissingColumn(COLUMN_HEADERS[COL_X]))?;
    let y_col = sheet
        .column_index(COLUMN_HEADERS[COL_Y])
        .ok_or(GeorefError::MissingColumn(COLUMN_HEADERS[COL_Y]))?;
    let lat_col = sheet
        .column_index(LAT_HEADER)
        .ok_or(GeorefError::MissingColumn(LAT_HEADER))?;
    let lng_col = sheet
        .column_index(LNG_HEADER)
        .ok_or(GeorefError::MissingColumn(LNG_HEADER))?;

    let centimeters = !is_integer_column(sheet, x_col) && !is_integer_column(sheet, y_col);

    struct RowInput {
        photo: String,
        px: Option<(f64, f64)>,
        lat_lng: Option<(f64, f64)>,
    }
    let inputs: Vec<RowInput> = sheet
        .rows
        .iter()
        .map(|r| RowInput {
            photo: r[photo_col].to_string(),
            px: r[x_col]
                .coerce_f64()
                .zip(r[y_col].coerce_f64())
                .map(|(x, y)| to_pixels(x, y, centimeters)),
            lat_lng: r[lat_col].coerce_f64().zip(r[lng_col].coerce_f64()),
        })
        .collect();

    // First pass: one transform per photo name
    let mut groups: BTreeMap<String, Vec<ControlPoint>> = BTreeMap::new();
    let mut photos: Vec<String> = Vec::new();
    for input in &inputs {
        if input.photo.trim().is_empty() {
            continue;
        }
        if !photos.contains(&input.photo) {
            photos.push(input.photo.clone());
        }
        if let (Some((x_px, y_px)), Some((lat, lng))) = (input.px, input.lat_lng) {
            groups
                .entry(input.photo.clone())
                .or_default()
                .push(ControlPoint { x_px, y_px, lat, lng });
        }
    }

    let mut transforms = BTreeMap::new();
    let mut skipped = Vec::new();
    for photo in photos {
        let points = groups.get(&photo).map(Vec::as_slice).unwrap_or(&[]);
        match ImageTransform::from_points(points) {
            Some(t) => {
                log::info!(
                    "Transform for {}: X = {:.6} * x + {:.6}, Y = {:.6} * y + {:.6}",
                    photo,
                    t.x_fit.slope,
                    t.x_fit.intercept,
                    t.y_fit.slope,
                    t.y_fit.intercept
                );
                transforms.insert(photo, t);
            }
            None => {
                log::warn!("Not enough known coordinates for {}", photo);
                skipped.push(photo);
            }
        }
    }

    // Computed columns start empty on every run, reusing any left by an earlier one
    let cols: Vec<usize> = OUTPUT_COLUMNS
        .iter()
        .map(|name| {
            sheet.column_index(name).unwrap_or_else(|| {
                sheet.headers.push(name.to_string());
                sheet.headers.len() - 1
            })
        })
        .collect();
    let width = sheet.headers.len();
    for row in &mut sheet.rows {
        row.resize(width, CellValue::Empty);
        for &col in &cols {
            row[col] = CellValue::Empty;
        }
    }

    // Second pass: control points keep the projection of their own lat/lng,
    // every other cell comes from the image transform
    let mut located_rows = 0;
    for (row, input) in sheet.rows.iter_mut().zip(&inputs) {
        let Some((x_px, y_px)) = input.px else {
            continue;
        };
        let group = groups.get(&input.photo).filter(|points| points.len() >= 2);
        if let (Some(points), Some((lat, lng))) = (group, input.lat_lng) {
            let max_y = points.iter().map(|p| p.y_px).fold(f64::NEG_INFINITY, f64::max);
            let (x3857, y3857) = to_web_mercator(lng, lat);
            fill_empty(
                row,
                &cols,
                [Some(x3857), Some(y3857), None, None, Some(x_px), Some(y_px), Some(max_y - y_px)],
            );
        }

        let Some(t) = transforms.get(&input.photo) else {
            continue;
        };
        let (x3857, y3857) = t.pixel_to_mercator(x_px, y_px);
        let calculated = input
            .lat_lng
            .is_none()
            .then(|| t.pixel_to_lat_lng(x_px, y_px));
        fill_empty(
            row,
            &cols,
            [
                Some(x3857),
                Some(y3857),
                calculated.map(|(lat, _)| lat),
                calculated.map(|(_, lng)| lng),
                Some(x_px),
                Some(y_px),
                Some(t.flip_y(y_px)),
            ],
        );
        located_rows += 1;
    }

    Ok(GeorefReport {
        output: PathBuf::new(),
        transforms,
        skipped,
        located_rows,
        total_rows: sheet.rows.len(),
    })
}

fn fill_empty(row: &mut [CellValue], cols: &[usize], values: [Option<f64>; 7]) {
    for (&col, value) in cols.iter().zip(values) {
        if let (Some(v), true) = (value, row[col].is_empty()) {
            row[col] = CellValue::Float(v);
        }
    }
}

/// Write a sheet to a new single-worksheet workbook
pub fn write_sheet(sheet: &Sheet, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (c, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string(0, c as u16, header.as_str())?;
    }
    for (r, row) in sheet.rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    worksheet.write_string(r, c, s.as_str())?;
                }
                CellValue::Integer(i) => {
                    worksheet.write_number(r, c, *i as f64)?;
                }
                CellValue::Float(f) if f.is_finite() => {
                    worksheet.write_number(r, c, *f)?;
                }
                CellValue::Float(_) => {}
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

/// Georeference a workbook and save `<stem>_with_coordinates.xlsx` beside it
pub fn georeference_workbook<P: AsRef<Path>>(input: P) -> Result<GeorefReport, GeorefError> {
    let input = input.as_ref();
    log::info!("Georeferencing {}", input.display());
    let mut sheet = Sheet::read(input)?;
    let mut report = georeference_sheet(&mut sheet)?;

    let output = output_path(input);
    write_sheet(&sheet, &output)?;
    log::info!("Saved results to {}", output.display());
    report.output = output;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    fn sheet(rows: Vec<Vec<CellValue>>) -> Sheet {
        Sheet::from_parts(
            vec![
                "사진 이름".into(),
                "좌표 X".into(),
                "좌표 Y".into(),
                LAT_HEADER.into(),
                LNG_HEADER.into(),
            ],
            rows,
        )
    }

    #[test]
    fn test_output_path() {
        let out = output_path(Path::new("/data/dikes.xlsx"));
        assert_eq!(out, PathBuf::from("/data/dikes_with_coordinates.xlsx"));
    }

    #[test]
    fn test_cm_to_pixels_rounds_half_even() {
        // 1 cm = 37.795296 px
        assert_eq!(to_pixels(1.0, 2.0, true), (38.0, 76.0));
        assert_eq!(to_pixels(120.0, 45.0, false), (120.0, 45.0));
    }

    #[test]
    fn test_transform_recovers_control_points() {
        let points = [
            ControlPoint { x_px: 100.0, y_px: 400.0, lat: 37.0, lng: 127.0 },
            ControlPoint { x_px: 500.0, y_px: 100.0, lat: 37.1, lng: 127.1 },
            ControlPoint { x_px: 300.0, y_px: 250.0, lat: 37.05, lng: 127.05 },
        ];
        let t = ImageTransform::from_points(&points).unwrap();
        assert_eq!(t.max_y, 400.0);

        let (lat, lng) = t.pixel_to_lat_lng(100.0, 400.0);
        assert!((lat - 37.0).abs() < 1e-3, "lat = {}", lat);
        assert!((lng - 127.0).abs() < 1e-9, "lng = {}", lng);

        let (x, y) = t.lat_lng_to_pixel(37.1, 127.1).unwrap();
        assert!((x - 500.0).abs() < 1e-6);
        assert!((y - 100.0).abs() < 2.0);
    }

    #[test]
    fn test_transform_needs_two_distinct_points() {
        let p = ControlPoint { x_px: 1.0, y_px: 1.0, lat: 37.0, lng: 127.0 };
        assert!(ImageTransform::from_points(&[p]).is_none());
        assert!(ImageTransform::from_points(&[p, p]).is_none());
    }

    #[test]
    fn test_georeference_sheet() {
        let mut s = sheet(vec![
            vec![text("A"), CellValue::Integer(100), CellValue::Integer(400), CellValue::Float(37.0), CellValue::Float(127.0)],
            vec![text("A"), CellValue::Integer(500), CellValue::Integer(100), CellValue::Float(37.1), CellValue::Float(127.1)],
            vec![text("A"), CellValue::Integer(300), CellValue::Integer(250), CellValue::Empty, CellValue::Empty],
            vec![text("B"), CellValue::Integer(10), CellValue::Integer(10), CellValue::Float(36.0), CellValue::Float(128.0)],
        ]);
        let report = georeference_sheet(&mut s).unwrap();

        assert_eq!(report.transforms.len(), 1);
        assert_eq!(report.skipped, vec!["B".to_string()]);
        assert_eq!(report.located_rows, 3);
        assert_eq!(report.total_rows, 4);
        assert_eq!(s.headers.len(), 5 + OUTPUT_COLUMNS.len());

        let lat_col = s.column_index("Calculated_Lat").unwrap();
        let lng_col = s.column_index("Calculated_Lng").unwrap();
        let flip_col = s.column_index("Pixel_Y_Flipped").unwrap();

        // Known rows keep their own lat/lng
        assert_eq!(s.rows[0][lat_col], CellValue::Empty);
        assert_eq!(s.rows[0][flip_col], CellValue::Float(0.0));

        // Unknown row sits halfway between the two control points
        let lat = s.rows[2][lat_col].as_f64().unwrap();
        let lng = s.rows[2][lng_col].as_f64().unwrap();
        assert!((lng - 127.05).abs() < 1e-9, "lng = {}", lng);
        assert!((lat - 37.05).abs() < 1e-3, "lat = {}", lat);
        assert_eq!(s.rows[2][flip_col], CellValue::Float(150.0));

        // Image without a transform stays empty
        assert!(s.rows[3][lat_col + 2].is_empty());
    }

    #[test]
    fn test_rerun_recomputes_output_columns() {
        let mut s = sheet(vec![
            vec![text("A"), CellValue::Integer(100), CellValue::Integer(400), CellValue::Float(37.0), CellValue::Float(127.0)],
            vec![text("A"), CellValue::Integer(500), CellValue::Integer(100), CellValue::Float(37.1), CellValue::Float(127.1)],
            vec![text("B"), CellValue::Integer(10), CellValue::Integer(10), CellValue::Empty, CellValue::Empty],
        ]);
        georeference_sheet(&mut s).unwrap();
        let pixel_x = s.column_index("Pixel_X").unwrap();
        s.rows[0][pixel_x] = CellValue::Float(-1.0);
        s.rows[2][pixel_x] = CellValue::Float(-1.0);

        georeference_sheet(&mut s).unwrap();
        assert_eq!(s.headers.len(), 5 + OUTPUT_COLUMNS.len());
        // Stale values are replaced, or cleared where nothing applies
        assert_eq!(s.rows[0][pixel_x], CellValue::Float(100.0));
        assert_eq!(s.rows[1][pixel_x], CellValue::Float(500.0));
        assert!(s.rows[2][pixel_x].is_empty());
    }

    #[test]
    fn test_control_points_keep_own_projection() {
        // Three points that do not lie on one line
        let mut s = sheet(vec![
            vec![text("A"), CellValue::Integer(100), CellValue::Integer(400), CellValue::Float(37.0), CellValue::Float(127.0)],
            vec![text("A"), CellValue::Integer(500), CellValue::Integer(100), CellValue::Float(37.1), CellValue::Float(127.1)],
            vec![text("A"), CellValue::Integer(320), CellValue::Integer(240), CellValue::Float(37.06), CellValue::Float(127.02)],
        ]);
        georeference_sheet(&mut s).unwrap();
        let x_col = s.column_index("X_3857").unwrap();
        let y_col = s.column_index("Y_3857").unwrap();

        let (x, y) = to_web_mercator(127.02, 37.06);
        assert_eq!(s.rows[2][x_col], CellValue::Float(x));
        assert_eq!(s.rows[2][y_col], CellValue::Float(y));

        let t = ImageTransform::from_points(&[
            ControlPoint { x_px: 100.0, y_px: 400.0, lat: 37.0, lng: 127.0 },
            ControlPoint { x_px: 500.0, y_px: 100.0, lat: 37.1, lng: 127.1 },
            ControlPoint { x_px: 320.0, y_px: 240.0, lat: 37.06, lng: 127.02 },
        ])
        .unwrap();
        assert!((t.pixel_to_mercator(320.0, 240.0).0 - x).abs() > 1.0);
    }

    #[test]
    fn test_missing_lat_column() {
        let mut s = Sheet::from_parts(
            vec!["사진 이름".into(), "좌표 X".into(), "좌표 Y".into()],
            vec![],
        );
        let err = georeference_sheet(&mut s).unwrap_err();
        assert!(matches!(err, GeorefError::MissingColumn(LAT_HEADER)));
    }
}
