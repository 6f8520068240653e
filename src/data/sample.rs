//! Built-in sample rows shown until a workbook is loaded.

use super::record::{CellValue, DikeRecord};

#[allow(clippy::too_many_arguments)]
fn row(
    region: &str,
    symbol: &str,
    stratum: &str,
    rock_type: &str,
    era: &str,
    angle: f64,
    distance_km: f64,
    address: &str,
    color: &str,
    x: f64,
    y: f64,
    photo: &str,
) -> DikeRecord {
    DikeRecord::new(vec![
        region.into(),
        symbol.into(),
        stratum.into(),
        rock_type.into(),
        era.into(),
        CellValue::Float(angle),
        CellValue::Float(distance_km),
        address.into(),
        color.into(),
        CellValue::Float(x),
        CellValue::Float(y),
        photo.into(),
    ])
}

/// Six observations across three map sheets
pub fn sample_records() -> Vec<DikeRecord> {
    vec![
        row("마전리", "ls", "연천층군 미산층", "석회암", "선캄브리아시대 원생누대", -10.8, 0.26,
            "경기도 연천군 미산면 아미리 576-3", "하늘색", 30.62, 12.49, "0. 마전리"),
        row("마전리", "ls", "연천층군 미산층", "석회암", "선캄브리아시대 원생누대", -42.3, 0.18,
            "경기도 연천군 백학면 전동리 산 1", "하늘색", 24.99, 17.0, "0. 마전리"),
        row("마전리", "ls", "연천층군 미산층", "석회암", "선캄브리아시대 원생누대", -48.1, 0.2,
            "경기도 연천군 백학면 전동리 산 71", "하늘색", 20.01, 17.56, "0. 마전리"),
        row("오호", "Krhd", "유문암맥", "유문암맥", "중생대 백악기", -2.1, 0.19,
            "강원특별자치도 고성군 죽왕면 가진리 산 59", "빨간색", 1.15, 17.02, "1. 오호"),
        row("만대리", "Kad", "유문암, 규장암", "산성암맥 유문암, 규장암", "중생대 백악기", -87.7, 0.36,
            "강원특별자치도 인제군 서화면 서흥리 851-4", "빨간색", 32.11, 19.42, "3. 만대리"),
        row("만대리", "Kad", "유문암, 규장암", "산성암맥 유문암, 규장암", "중생대 백악기", -68.9, 0.39,
            "강원특별자치도 양구군 동면 팔랑리 산 10-4", "빨간색", 13.57, 14.05, "3. 만대리"),
    ]
}
