//! Coordinate math: Web Mercator, per-image georeferencing and measurement.

pub mod fit;
pub mod georef;
pub mod measure;
pub mod mercator;

pub use fit::LinearFit;
pub use georef::{
    georeference_workbook, transform_for_photo, GeorefError, GeorefReport, ImageTransform,
};
pub use measure::{measure, Measurement};
pub use mercator::{from_web_mercator, to_web_mercator};
