//! Integration tests for workbook georeferencing
//!
//! Run with: cargo test --test georef_test -- --nocapture

use std::path::Path;

use dikefinder::data::Sheet;
use dikefinder::geodesy::georef::{output_path, OUTPUT_COLUMNS};
use dikefinder::geodesy::{georeference_workbook, GeorefError};
use rust_xlsxwriter::Workbook;

const HEADERS: [&str; 5] = ["사진 이름", "좌표 X", "좌표 Y", "코드1 좌표 Lat", "코드 1 좌표 Lng"];

/// (photo, x, y, lat/lng)
type Row<'a> = (&'a str, f64, f64, Option<(f64, f64)>);

fn write_input(path: &Path, rows: &[Row]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, h) in HEADERS.iter().enumerate() {
        sheet.write_string(0, c as u16, *h).unwrap();
    }
    for (r, (photo, x, y, lat_lng)) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        sheet.write_string(r, 0, *photo).unwrap();
        sheet.write_number(r, 1, *x).unwrap();
        sheet.write_number(r, 2, *y).unwrap();
        if let Some((lat, lng)) = lat_lng {
            sheet.write_number(r, 3, *lat).unwrap();
            sheet.write_number(r, 4, *lng).unwrap();
        }
    }
    workbook.save(path).unwrap();
}

#[test]
fn test_georeference_workbook_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("dikes.xlsx");
    write_input(
        &input,
        &[
            ("1. 오호", 100.0, 400.0, Some((37.0, 127.0))),
            ("1. 오호", 500.0, 100.0, Some((37.1, 127.1))),
            ("1. 오호", 300.0, 250.0, None),
            ("2. 만대리", 10.0, 10.0, Some((38.0, 128.0))),
        ],
    );

    let report = georeference_workbook(&input).unwrap();
    println!("[*] Report: {:?}", report);

    assert_eq!(report.output, dir.path().join("dikes_with_coordinates.xlsx"));
    assert_eq!(report.output, output_path(&input));
    assert!(report.output.is_file());
    assert_eq!(report.transforms.len(), 1);
    assert!(report.transforms.contains_key("1. 오호"));
    assert_eq!(report.skipped, vec!["2. 만대리".to_string()]);
    assert_eq!(report.located_rows, 3);
    assert_eq!(report.total_rows, 4);

    let out = Sheet::from_file(&report.output).unwrap();
    assert_eq!(out.headers.len(), HEADERS.len() + OUTPUT_COLUMNS.len());
    for name in OUTPUT_COLUMNS {
        assert!(out.column_index(name).is_some(), "missing {}", name);
    }
    assert_eq!(out.rows.len(), 4);

    let lat = out.column_index("Calculated_Lat").unwrap();
    let lng = out.column_index("Calculated_Lng").unwrap();
    let x3857 = out.column_index("X_3857").unwrap();
    let flipped = out.column_index("Pixel_Y_Flipped").unwrap();

    // Control points keep their own coordinates
    assert!(out.rows[0][lat].is_empty());
    assert!(out.rows[0][x3857].as_f64().is_some());

    let calc_lng = out.rows[2][lng].as_f64().unwrap();
    let calc_lat = out.rows[2][lat].as_f64().unwrap();
    assert!((calc_lng - 127.05).abs() < 1e-9, "lng = {}", calc_lng);
    assert!((calc_lat - 37.05).abs() < 1e-3, "lat = {}", calc_lat);
    assert_eq!(out.rows[2][flipped].as_f64(), Some(150.0));

    // Sheet without enough control points gets no coordinates
    assert!(out.rows[3][x3857].is_empty());
}

#[test]
fn test_output_keeps_every_input_column() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("extra.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, h) in HEADERS.iter().enumerate() {
        sheet.write_string(0, c as u16, *h).unwrap();
    }
    sheet.write_string(0, 5, "200 아래").unwrap();
    // Column 6 has no header
    let rows = [(100.0, 400.0, 37.0, 127.0), (500.0, 100.0, 37.1, 127.1)];
    for (r, (x, y, lat, lng)) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        sheet.write_string(r, 0, "1. 오호").unwrap();
        sheet.write_number(r, 1, *x).unwrap();
        sheet.write_number(r, 2, *y).unwrap();
        sheet.write_number(r, 3, *lat).unwrap();
        sheet.write_number(r, 4, *lng).unwrap();
        sheet.write_string(r, 5, "o").unwrap();
        sheet.write_string(r, 6, "note").unwrap();
    }
    workbook.save(&input).unwrap();

    let report = georeference_workbook(&input).unwrap();
    let out = Sheet::read(&report.output).unwrap();

    assert_eq!(out.headers.len(), 7 + OUTPUT_COLUMNS.len());
    assert_eq!(out.headers[5], "200 아래");
    assert_eq!(out.headers[6], "");
    assert_eq!(out.rows[0][5].to_string(), "o");
    assert_eq!(out.rows[1][6].to_string(), "note");
    assert_eq!(out.column_index("X_3857"), Some(7));
}

#[test]
fn test_centimetre_coordinates_are_converted() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cm.xlsx");
    write_input(
        &input,
        &[
            ("0. 마전리", 1.5, 2.5, Some((37.0, 127.0))),
            ("0. 마전리", 10.25, 12.75, Some((37.2, 127.3))),
        ],
    );

    let report = georeference_workbook(&input).unwrap();
    let out = Sheet::from_file(&report.output).unwrap();
    let px = out.column_index("Pixel_X").unwrap();
    let py = out.column_index("Pixel_Y").unwrap();

    // 1.5 cm * 0.393701 * 96 = 56.69 -> 57
    assert_eq!(out.rows[0][px].as_f64(), Some(57.0));
    assert_eq!(out.rows[0][py].as_f64(), Some(94.0));
}

#[test]
fn test_missing_columns_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "사진 이름").unwrap();
    sheet.write_string(1, 0, "1. 오호").unwrap();
    workbook.save(&input).unwrap();

    let err = georeference_workbook(&input).unwrap_err();
    assert!(matches!(err, GeorefError::MissingColumn("좌표 X")), "{}", err);
    assert!(!output_path(&input).exists());
}

#[test]
fn test_unreadable_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.xlsx");
    std::fs::write(&input, b"not a workbook").unwrap();

    let err = georeference_workbook(&input).unwrap_err();
    assert!(matches!(err, GeorefError::Excel(_)));
}
