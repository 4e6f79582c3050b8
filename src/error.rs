//! Unified error handling for the route-grouper library.
//!
//! Grouping itself never fails: missing tracks, empty inputs and absent
//! metrics degrade to sentinel or fallback values. These errors only come from
//! the fallible edges (strict polyline decoding, encoding, JSON input).

use thiserror::Error;

/// Unified error type for route-grouper operations.
#[derive(Debug, Error)]
pub enum RouteGroupError {
    /// Encoded polyline could not be decoded
    #[error("Polyline decode failed: {message}")]
    PolylineDecode { message: String },

    /// GPS track could not be encoded
    #[error("Polyline encode failed: {message}")]
    PolylineEncode { message: String },

    /// Activity or group JSON could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for route-grouper operations.
pub type Result<T> = std::result::Result<T, RouteGroupError>;
