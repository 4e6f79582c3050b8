//! Per-group statistics and output ordering.
//!
//! Statistics are computed once grouping has finished, so every member counts
//! regardless of when it joined.

use crate::track::decode_track;
use crate::{Activity, GpsPoint, GroupingConfig, RouteGroup};

/// Build a finished group from its members (representative first).
pub fn summarize_group(
    id: String,
    activities: Vec<Activity>,
    config: &GroupingConfig,
) -> RouteGroup {
    let average_distance = average_distance(&activities);
    let average_heart_rate = average_heart_rate(&activities);
    let center_point = activities
        .first()
        .map(|rep| center_point(rep, config.polyline_precision))
        .unwrap_or_else(GpsPoint::origin);

    RouteGroup {
        id,
        activities,
        average_distance,
        average_heart_rate,
        center_point,
    }
}

/// Mean distance in meters; 0.0 for no activities.
pub fn average_distance(activities: &[Activity]) -> f64 {
    if activities.is_empty() {
        return 0.0;
    }
    activities.iter().map(|a| a.distance).sum::<f64>() / activities.len() as f64
}

/// Mean heart rate over the activities that recorded one.
pub fn average_heart_rate(activities: &[Activity]) -> Option<f64> {
    let rates: Vec<f64> = activities
        .iter()
        .filter_map(|a| a.average_heart_rate)
        .collect();

    if rates.is_empty() {
        None
    } else {
        Some(rates.iter().sum::<f64>() / rates.len() as f64)
    }
}

/// Representative location of a route for map display.
///
/// Uses the recorded start point, then the middle point of the decoded track,
/// then the origin `(0, 0)` as a degraded fallback.
pub fn center_point(representative: &Activity, precision: u32) -> GpsPoint {
    if let Some(start) = representative.start_point() {
        return start;
    }

    let track = representative
        .track()
        .map(|encoded| decode_track(encoded, precision))
        .unwrap_or_default();

    track
        .get(track.len() / 2)
        .copied()
        .unwrap_or_else(GpsPoint::origin)
}

/// Order groups by member count, most repeated first.
///
/// The sort is stable: equally sized groups keep their creation order.
pub fn sort_by_size(groups: &mut [RouteGroup]) {
    groups.sort_by(|a, b| b.activities.len().cmp(&a.activities.len()));
}

/// Keep only routes run at least `min_count` times, preserving order.
pub fn filter_by_min_activities(groups: Vec<RouteGroup>, min_count: usize) -> Vec<RouteGroup> {
    groups
        .into_iter()
        .filter(|g| g.activities.len() >= min_count)
        .collect()
}
