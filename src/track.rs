//! Encoded polyline <-> GPS track conversion.
//!
//! Activity tracks arrive as Google encoded polylines: delta-compressed
//! coordinates at a fixed decimal precision (5 for the provider's
//! `summary_polyline`). Decoding is lossy only in that precision.

use geo::Coord;

use crate::error::{Result, RouteGroupError};
use crate::GpsPoint;

/// Decode an encoded polyline into an ordered GPS track.
///
/// Malformed or empty input yields an empty track. Callers treat an empty
/// track as "no track", never as a failure.
///
/// # Example
/// ```
/// use route_grouper::decode_track;
///
/// let track = decode_track("_p~iF~ps|U_ulLnnqC_mqNvxq`@", 5);
/// assert_eq!(track.len(), 3);
/// assert!((track[0].latitude - 38.5).abs() < 1e-9);
///
/// assert!(decode_track("", 5).is_empty());
/// ```
pub fn decode_track(encoded: &str, precision: u32) -> Vec<GpsPoint> {
    try_decode_track(encoded, precision).unwrap_or_default()
}

/// Decode an encoded polyline, reporting malformed input as an error.
pub fn try_decode_track(encoded: &str, precision: u32) -> Result<Vec<GpsPoint>> {
    if encoded.is_empty() {
        return Ok(Vec::new());
    }

    let line = polyline::decode_polyline(encoded, precision).map_err(|e| {
        RouteGroupError::PolylineDecode {
            message: e.to_string(),
        }
    })?;

    // geo uses (x, y) = (lng, lat)
    Ok(line.coords().map(|c| GpsPoint::new(c.y, c.x)).collect())
}

/// Encode a GPS track as a polyline at the given precision.
pub fn encode_track(points: &[GpsPoint], precision: u32) -> Result<String> {
    let coords: Vec<Coord<f64>> = points
        .iter()
        .map(|p| Coord {
            x: p.longitude,
            y: p.latitude,
        })
        .collect();

    polyline::encode_coordinates(coords, precision).map_err(|e| RouteGroupError::PolylineEncode {
        message: e.to_string(),
    })
}
