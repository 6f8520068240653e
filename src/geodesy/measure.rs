//! Distance and angle between two WGS84 positions.

use geo::{Distance, Geodesic, Point};

/// Result of a two-point measurement
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    /// Geodesic distance on the WGS84 ellipsoid, metres
    pub distance_m: f64,
    /// Map angle in degrees, clockwise from north, in [0, 360)
    pub angle_deg: f64,
}

/// Measure from point A to point B.
///
/// The angle is planar in degree space (`90 - atan2(dlat, dlng)`), which is
/// how the field sheets record it; it is not the geodesic azimuth.
/// A non-finite coordinate counts as missing and yields a zero measurement.
pub fn measure(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Measurement {
    if ![lat1, lng1, lat2, lng2].iter().all(|v| v.is_finite()) {
        return Measurement::default();
    }
    let a = Point::new(lng1, lat1);
    let b = Point::new(lng2, lat2);
    let distance_m = Geodesic::distance(a, b);

    let mut angle_deg = 90.0 - (lat2 - lat1).atan2(lng2 - lng1).to_degrees();
    if angle_deg < 0.0 {
        angle_deg += 360.0;
    }
    if angle_deg >= 360.0 {
        angle_deg -= 360.0;
    }
    Measurement {
        distance_m,
        angle_deg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let m = measure(0.0, 0.0, 0.0, 1.0);
        // WGS84: 111.319 km per degree on the equator
        assert!((m.distance_m - 111_319.49).abs() < 1.0, "{}", m.distance_m);
        assert!((m.angle_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angles() {
        assert!((measure(37.0, 127.0, 38.0, 127.0).angle_deg - 0.0).abs() < 1e-9);
        assert!((measure(37.0, 127.0, 36.0, 127.0).angle_deg - 180.0).abs() < 1e-9);
        assert!((measure(37.0, 127.0, 37.0, 126.0).angle_deg - 270.0).abs() < 1e-9);
        assert!((measure(37.0, 127.0, 38.0, 128.0).angle_deg - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_point() {
        let m = measure(37.5, 127.0, 37.5, 127.0);
        assert!(m.distance_m.abs() < 1e-6);
    }

    #[test]
    fn test_missing_input() {
        assert_eq!(measure(37.0, f64::NAN, 38.0, 127.0), Measurement::default());
        assert_eq!(measure(37.0, 127.0, f64::INFINITY, 127.0), Measurement::default());
    }
}
