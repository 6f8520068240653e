//! Spherical Web Mercator (EPSG:3857) <-> WGS84 (EPSG:4326)

use std::f64::consts::FRAC_PI_4;

/// WGS84 semi-major axis used by EPSG:3857
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// (lng, lat) degrees -> (x, y) metres
pub fn to_web_mercator(lng: f64, lat: f64) -> (f64, f64) {
    let x = EARTH_RADIUS * lng.to_radians();
    let y = EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// (x, y) metres -> (lng, lat) degrees
pub fn from_web_mercator(x: f64, y: f64) -> (f64, f64) {
    let lng = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lng, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        let (x, y) = to_web_mercator(0.0, 0.0);
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_known_point() {
        // Seoul City Hall
        let (x, y) = to_web_mercator(126.9780, 37.5665);
        assert!((x - 14_135_126.3).abs() < 1.0, "x = {}", x);
        assert!((y - 4_518_366.5).abs() < 1.0, "y = {}", y);
    }

    #[test]
    fn test_round_trip() {
        for (lng, lat) in [(127.0, 38.0), (-73.98, 40.75), (151.2, -33.87)] {
            let (x, y) = to_web_mercator(lng, lat);
            let (lng2, lat2) = from_web_mercator(x, y);
            assert!((lng - lng2).abs() < 1e-9);
            assert!((lat - lat2).abs() < 1e-9);
        }
    }
}
