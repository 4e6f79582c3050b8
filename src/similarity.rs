//! Track similarity using a directed Average Minimum Distance (AMD).
//!
//! For every sampled point of the candidate track, find the nearest sampled
//! point of the reference track; the similarity is the mean of those minimum
//! distances in meters. Lower is more similar, 0.0 means every candidate
//! sample lies on a reference sample.
//!
//! The measure is one-sided: `similarity(a, b)` need not equal
//! `similarity(b, a)`. Grouping always evaluates candidate against group
//! representative, never the reverse.

use crate::geo_utils::haversine_distance;
use crate::track::decode_track;
use crate::{Activity, GpsPoint, GroupingConfig};

/// Similarity reported when either side has no usable track.
///
/// Strictly greater than any finite threshold and not less than an infinite
/// one, so it never satisfies `similarity < threshold`.
pub const SIMILARITY_SENTINEL: f64 = f64::INFINITY;

/// Decoded and subsampled track of one activity, ready for comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSignature {
    pub activity_id: u64,
    /// Every `sample_stride`-th decoded point, starting at index 0
    pub points: Vec<GpsPoint>,
}

impl TrackSignature {
    /// Build the signature of an activity's track.
    ///
    /// Returns `None` if the activity has no track or the track decodes to no
    /// points.
    pub fn from_activity(activity: &Activity, config: &GroupingConfig) -> Option<Self> {
        let encoded = activity.track()?;
        let decoded = decode_track(encoded, config.polyline_precision);
        if decoded.is_empty() {
            return None;
        }

        Some(Self {
            activity_id: activity.id,
            points: subsample_track(&decoded, config.sample_stride),
        })
    }
}

/// Directed similarity between two activities' tracks, in meters.
///
/// Decodes both tracks on every call; when comparing one activity against
/// many, build [`TrackSignature`]s once and use [`signature_similarity`].
///
/// # Example
/// ```
/// use route_grouper::{encode_track, route_similarity, Activity, GpsPoint, GroupingConfig};
/// use route_grouper::SIMILARITY_SENTINEL;
///
/// let track: Vec<GpsPoint> = (0..20)
///     .map(|i| GpsPoint::new(46.52 + i as f64 * 0.0004, 6.63))
///     .collect();
/// let encoded = encode_track(&track, 5).unwrap();
///
/// let a = Activity::new(1, "Run", 900.0).with_track(&encoded);
/// let b = Activity::new(2, "Run", 900.0).with_track(&encoded);
/// let untracked = Activity::new(3, "Run", 900.0);
///
/// let config = GroupingConfig::default();
/// assert_eq!(route_similarity(&a, &b, &config), 0.0);
/// assert_eq!(route_similarity(&a, &untracked, &config), SIMILARITY_SENTINEL);
/// ```
pub fn route_similarity(
    candidate: &Activity,
    reference: &Activity,
    config: &GroupingConfig,
) -> f64 {
    match (
        TrackSignature::from_activity(candidate, config),
        TrackSignature::from_activity(reference, config),
    ) {
        (Some(c), Some(r)) => signature_similarity(&c, &r),
        _ => SIMILARITY_SENTINEL,
    }
}

/// Directed similarity between two prebuilt signatures, in meters.
pub fn signature_similarity(candidate: &TrackSignature, reference: &TrackSignature) -> f64 {
    average_min_distance(&candidate.points, &reference.points)
}

/// Calculate Average Minimum Distance from route1 to route2.
///
/// For each point in route1, find the minimum distance to any point in route2.
/// Return the average of these minimum distances. Either route being empty
/// yields [`SIMILARITY_SENTINEL`].
pub fn average_min_distance(route1: &[GpsPoint], route2: &[GpsPoint]) -> f64 {
    if route1.is_empty() || route2.is_empty() {
        return SIMILARITY_SENTINEL;
    }

    let total_min_dist: f64 = route1
        .iter()
        .map(|p1| {
            route2
                .iter()
                .map(|p2| haversine_distance(p1, p2))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();

    total_min_dist / route1.len() as f64
}

/// Keep points at indices 0, stride, 2*stride, ...
///
/// A stride of 0 is treated as 1. A non-empty track always keeps its first
/// point.
pub fn subsample_track(points: &[GpsPoint], stride: usize) -> Vec<GpsPoint> {
    points.iter().step_by(stride.max(1)).copied().collect()
}
