//! Progress over repeated efforts on one route.
//!
//! Turns a [`RouteGroup`]'s members into a chronological series of per-effort
//! metrics (heart rate, pace, cadence, calories) and summarizes how pace has
//! changed. Also provides the time-window filter applied to activity lists
//! before grouping.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::{Activity, RouteGroup};

/// One effort on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub activity_id: u64,
    pub start_date: Option<DateTime<Utc>>,
    /// Distance in meters
    pub distance: f64,
    /// Average heart rate (bpm)
    pub heart_rate: Option<f64>,
    /// Minutes per kilometer
    pub pace_min_per_km: Option<f64>,
    /// Steps per minute (both feet)
    pub cadence_spm: Option<f64>,
    pub calories: Option<f64>,
}

impl ProgressPoint {
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            activity_id: activity.id,
            start_date: parse_start_date(activity),
            distance: activity.distance,
            heart_rate: activity.average_heart_rate,
            pace_min_per_km: activity.average_speed.and_then(pace_min_per_km),
            // Provider cadence counts one foot
            cadence_spm: activity.average_cadence.map(|c| c * 2.0),
            calories: activity.calories,
        }
    }
}

/// Summary of a route's progress series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub efforts: usize,
    /// Fastest pace (lowest min/km)
    pub best_pace: Option<f64>,
    pub first_pace: Option<f64>,
    pub latest_pace: Option<f64>,
    /// `latest_pace - first_pace`; negative means faster
    pub pace_change: Option<f64>,
}

/// Time window applied to an activity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    Month,
    ThreeMonths,
    SixMonths,
    Year,
    All,
}

impl TimeRange {
    /// Length of the window in calendar months, `None` for [`TimeRange::All`].
    pub fn months(&self) -> Option<u32> {
        match self {
            TimeRange::Month => Some(1),
            TimeRange::ThreeMonths => Some(3),
            TimeRange::SixMonths => Some(6),
            TimeRange::Year => Some(12),
            TimeRange::All => None,
        }
    }

    /// Earliest start date inside the window ending at `now`.
    ///
    /// Steps back whole calendar months; a day past the end of the target
    /// month clamps to its last day.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        now.checked_sub_months(Months::new(self.months()?))
    }
}

/// Convert a speed in m/s to minutes per kilometer.
pub fn pace_min_per_km(speed: f64) -> Option<f64> {
    if speed.is_finite() && speed > 0.0 {
        Some((1000.0 / 60.0) / speed)
    } else {
        None
    }
}

/// Chronological progress series for a route.
///
/// Members without a parseable `start_date` follow the dated ones in their
/// group order.
pub fn route_progress(group: &RouteGroup) -> Vec<ProgressPoint> {
    let mut points: Vec<ProgressPoint> = group
        .activities
        .iter()
        .map(ProgressPoint::from_activity)
        .collect();

    // Stable; None sorts last
    points.sort_by(|a, b| match (a.start_date, b.start_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    points
}

/// Summarize a progress series produced by [`route_progress`].
pub fn summarize_progress(points: &[ProgressPoint]) -> ProgressSummary {
    let paces: Vec<f64> = points.iter().filter_map(|p| p.pace_min_per_km).collect();

    let best_pace = paces.iter().copied().reduce(f64::min);
    let first_pace = paces.first().copied();
    let latest_pace = paces.last().copied();
    let pace_change = match (first_pace, latest_pace) {
        (Some(first), Some(latest)) if paces.len() > 1 => Some(latest - first),
        _ => None,
    };

    ProgressSummary {
        efforts: points.len(),
        best_pace,
        first_pace,
        latest_pace,
        pace_change,
    }
}

/// Keep activities that started within `range` before `now`.
///
/// Activities without a parseable start date are only kept for
/// [`TimeRange::All`].
pub fn filter_by_time_range(
    activities: &[Activity],
    range: TimeRange,
    now: DateTime<Utc>,
) -> Vec<Activity> {
    let Some(cutoff) = range.cutoff(now) else {
        return activities.to_vec();
    };

    activities
        .iter()
        .filter(|a| parse_start_date(a).is_some_and(|start| start >= cutoff))
        .cloned()
        .collect()
}

fn parse_start_date(activity: &Activity) -> Option<DateTime<Utc>> {
    let raw = activity.start_date.as_deref()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
