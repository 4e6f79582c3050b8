//! # Route Grouper
//!
//! Groups repeated GPS activities into "familiar routes" so repeated efforts on
//! the same track can be compared over time.
//!
//! This library provides:
//! - Encoded polyline decoding into GPS tracks
//! - A directed Average Minimum Distance (AMD) similarity between two tracks
//! - Greedy, order-preserving grouping of activities against each group's
//!   first activity
//! - Per-route statistics and progress series
//!
//! ## Features
//!
//! - **`parallel`** - Build track signatures in parallel with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use route_grouper::{encode_track, group_activities, Activity, GpsPoint};
//!
//! let track: Vec<GpsPoint> = (0..30)
//!     .map(|i| GpsPoint::new(51.5074 + i as f64 * 0.0005, -0.1278))
//!     .collect();
//! let encoded = encode_track(&track, 5).unwrap();
//!
//! let activities = vec![
//!     Activity::new(1, "Run", 1600.0).with_track(&encoded),
//!     Activity::new(2, "Run", 1650.0).with_track(&encoded),
//! ];
//!
//! let groups = group_activities(&activities, 50.0);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].activities.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, RouteGroupError};

// Encoded polyline <-> GPS track
pub mod track;
pub use track::{decode_track, encode_track, try_decode_track};

// Geographic utilities (great-circle distance)
pub mod geo_utils;

// Track similarity (directed AMD over subsampled tracks)
pub mod similarity;
pub use similarity::{route_similarity, TrackSignature, SIMILARITY_SENTINEL};

// Greedy route grouping
pub mod grouping;
pub use grouping::{
    group_activities, group_activities_json, group_activities_with_config,
    group_activities_with_matches,
};

// Per-group statistics and ordering
pub mod aggregate;
pub use aggregate::{center_point, filter_by_min_activities};

// Progress over repeated efforts
pub mod progress;
pub use progress::{
    filter_by_time_range, route_progress, summarize_progress, ProgressPoint, ProgressSummary,
    TimeRange,
};

/// Threshold (meters) that calling layers conventionally start from.
///
/// The grouping functions never fall back to this value; the threshold is
/// always an explicit argument.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 50.0;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use route_grouper::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The fallback point used when a route has no usable location.
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Map summary attached to an activity by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityMap {
    #[serde(default)]
    pub id: Option<String>,
    /// Encoded polyline of the whole activity (precision 5)
    #[serde(default)]
    pub summary_polyline: Option<String>,
}

/// A recorded activity as delivered by the activity source.
///
/// Field names follow the provider's JSON so a raw activity list deserializes
/// directly. Only `id`, `type` and `distance` are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Sport type (e.g., "Run", "Ride")
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: u32,
    /// Elapsed time in seconds
    #[serde(default)]
    pub elapsed_time: u32,
    /// Start time, RFC 3339
    #[serde(default)]
    pub start_date: Option<String>,
    /// `[lat, lng]`; the provider sends `[]` for activities without GPS
    #[serde(default)]
    pub start_latlng: Option<Vec<f64>>,
    /// Average speed in m/s
    #[serde(default)]
    pub average_speed: Option<f64>,
    #[serde(default, rename = "average_heartrate")]
    pub average_heart_rate: Option<f64>,
    #[serde(default, rename = "max_heartrate")]
    pub max_heart_rate: Option<f64>,
    /// Cadence as reported by the provider (one foot, per minute)
    #[serde(default)]
    pub average_cadence: Option<f64>,
    #[serde(default)]
    pub average_watts: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub map: Option<ActivityMap>,
}

impl Activity {
    /// Create an activity with only the fields grouping needs.
    pub fn new(id: u64, activity_type: &str, distance: f64) -> Self {
        Self {
            id,
            name: String::new(),
            activity_type: activity_type.to_string(),
            distance,
            moving_time: 0,
            elapsed_time: 0,
            start_date: None,
            start_latlng: None,
            average_speed: None,
            average_heart_rate: None,
            max_heart_rate: None,
            average_cadence: None,
            average_watts: None,
            calories: None,
            map: None,
        }
    }

    /// Attach an encoded polyline track.
    pub fn with_track(mut self, encoded: &str) -> Self {
        self.map = Some(ActivityMap {
            id: None,
            summary_polyline: Some(encoded.to_string()),
        });
        self
    }

    pub fn with_heart_rate(mut self, bpm: f64) -> Self {
        self.average_heart_rate = Some(bpm);
        self
    }

    pub fn with_start(mut self, point: GpsPoint) -> Self {
        self.start_latlng = Some(vec![point.latitude, point.longitude]);
        self
    }

    pub fn with_start_date(mut self, rfc3339: &str) -> Self {
        self.start_date = Some(rfc3339.to_string());
        self
    }

    pub fn with_average_speed(mut self, meters_per_second: f64) -> Self {
        self.average_speed = Some(meters_per_second);
        self
    }

    /// The encoded track, if the activity has a non-empty one.
    pub fn track(&self) -> Option<&str> {
        self.map
            .as_ref()
            .and_then(|m| m.summary_polyline.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// The recorded start point, if `start_latlng` is a `[lat, lng]` pair.
    ///
    /// Coordinates are taken as recorded, without range checks.
    pub fn start_point(&self) -> Option<GpsPoint> {
        match self.start_latlng.as_deref() {
            Some([lat, lng]) => Some(GpsPoint::new(*lat, *lng)),
            _ => None,
        }
    }
}

/// A group of activities judged to be the same route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGroup {
    /// `route-{n}`, where `n` is the creation index within one grouping call
    pub id: String,
    /// Members in assignment order; the first is the representative
    pub activities: Vec<Activity>,
    /// Mean distance of all members in meters
    pub average_distance: f64,
    /// Mean of the members' average heart rates, `None` if no member has one
    pub average_heart_rate: Option<f64>,
    /// Representative location for map display
    pub center_point: GpsPoint,
}

/// Similarity of one group member to its group's representative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityMatchInfo {
    pub activity_id: u64,
    /// Directed AMD in meters (0.0 for the representative itself)
    pub similarity: f64,
}

/// Result from grouping activities, including per-member match info.
#[derive(Debug, Clone)]
pub struct GroupingResult {
    /// The route groups, ordered as [`group_activities`] orders them
    pub groups: Vec<RouteGroup>,
    /// Match info per group: group id -> members in assignment order
    pub activity_matches: std::collections::HashMap<String, Vec<ActivityMatchInfo>>,
}

/// Tunables for grouping other than the similarity threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Keep every n-th decoded point when comparing tracks.
    /// Default: 10
    pub sample_stride: usize,

    /// Decimal precision of the encoded polylines.
    /// Default: 5
    pub polyline_precision: u32,

    /// Only activities of this type are grouped.
    /// Default: "Run"
    pub activity_type: String,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            sample_stride: 10,
            polyline_precision: 5,
            activity_type: "Run".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
