//! # Geographic Utilities
//!
//! Great-circle distance between GPS points.
//!
//! The haversine formula assumes a spherical earth (mean radius 6,371,008.8 m)
//! and is accurate to within ~0.3% for GPS tracks, which is well below the
//! noise of a consumer GPS receiver.
//!
//! ```rust
//! use route_grouper::{GpsPoint, geo_utils};
//!
//! let a = GpsPoint::new(51.5074, -0.1278);
//! let b = GpsPoint::new(51.5084, -0.1278);
//! let dist = geo_utils::haversine_distance(&a, &b);
//! assert!((dist - 111.2).abs() < 1.0);
//! ```

use geo::{Distance, Haversine, Point};

use crate::GpsPoint;

/// Calculate haversine distance between two GPS points in meters.
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}
