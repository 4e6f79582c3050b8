//! Greedy route grouping.
//!
//! Activities are processed in input order. Each one joins the first group
//! (in creation order) whose representative, the group's first activity, it
//! is similar to; otherwise it starts a new group. Membership is only ever
//! tested against the representative, so the result depends on input order
//! and is not a globally optimal clustering. Callers rely on that exact
//! behavior for reproducible output.

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::aggregate::{sort_by_size, summarize_group};
use crate::error::Result;
use crate::similarity::{signature_similarity, TrackSignature, SIMILARITY_SENTINEL};
use crate::{Activity, ActivityMatchInfo, GroupingConfig, GroupingResult, RouteGroup};

/// A group while assignment is still running.
struct PendingGroup {
    id: String,
    /// Indices into the qualifying activities; the first is the representative
    members: Vec<usize>,
    /// Similarity of each member to the representative
    similarities: Vec<f64>,
}

impl PendingGroup {
    fn representative(&self) -> usize {
        self.members[0]
    }
}

/// Group activities into routes using the default configuration.
///
/// `threshold_meters` is the largest directed average distance (exclusive)
/// at which an activity still counts as the same route as a group's
/// representative.
///
/// # Example
/// ```
/// use route_grouper::{encode_track, group_activities, Activity, GpsPoint};
///
/// let here: Vec<GpsPoint> = (0..30).map(|i| GpsPoint::new(51.50 + i as f64 * 0.0005, -0.12)).collect();
/// let there: Vec<GpsPoint> = (0..30).map(|i| GpsPoint::new(40.71 + i as f64 * 0.0005, -74.0)).collect();
///
/// let activities = vec![
///     Activity::new(1, "Run", 1600.0).with_track(&encode_track(&here, 5).unwrap()),
///     Activity::new(2, "Run", 1600.0).with_track(&encode_track(&there, 5).unwrap()),
///     Activity::new(3, "Run", 1600.0).with_track(&encode_track(&here, 5).unwrap()),
///     Activity::new(4, "Ride", 1600.0).with_track(&encode_track(&here, 5).unwrap()),
/// ];
///
/// let groups = group_activities(&activities, 50.0);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].id, "route-0");
/// assert_eq!(groups[0].activities.len(), 2);
/// ```
pub fn group_activities(activities: &[Activity], threshold_meters: f64) -> Vec<RouteGroup> {
    group_activities_with_config(activities, threshold_meters, &GroupingConfig::default())
}

/// Group activities into routes.
pub fn group_activities_with_config(
    activities: &[Activity],
    threshold_meters: f64,
    config: &GroupingConfig,
) -> Vec<RouteGroup> {
    group_activities_with_matches(activities, threshold_meters, config).groups
}

/// Group activities and capture each member's similarity to its representative.
pub fn group_activities_with_matches(
    activities: &[Activity],
    threshold_meters: f64,
    config: &GroupingConfig,
) -> GroupingResult {
    let qualifying: Vec<&Activity> = activities
        .iter()
        .filter(|a| is_qualifying(a, config))
        .collect();

    debug!(
        "[RouteGrouper] Grouping {} of {} activities at {:.1}m",
        qualifying.len(),
        activities.len(),
        threshold_meters
    );

    if qualifying.is_empty() {
        return GroupingResult {
            groups: vec![],
            activity_matches: HashMap::new(),
        };
    }

    if !(threshold_meters.is_finite() && threshold_meters > 0.0) {
        warn!(
            "[RouteGrouper] Threshold {} can never be met; every activity becomes its own route",
            threshold_meters
        );
    }

    let signatures = build_signatures(&qualifying, config);
    let pending = assign_groups(&signatures, threshold_meters);

    let mut activity_matches: HashMap<String, Vec<ActivityMatchInfo>> =
        HashMap::with_capacity(pending.len());
    let mut groups: Vec<RouteGroup> = Vec::with_capacity(pending.len());

    for group in pending {
        let matches = group
            .members
            .iter()
            .zip(&group.similarities)
            .map(|(&idx, &similarity)| ActivityMatchInfo {
                activity_id: qualifying[idx].id,
                similarity,
            })
            .collect();
        activity_matches.insert(group.id.clone(), matches);

        let members = group
            .members
            .iter()
            .map(|&idx| qualifying[idx].clone())
            .collect();
        groups.push(summarize_group(group.id, members, config));
    }

    sort_by_size(&mut groups);

    debug!(
        "[RouteGrouper] Formed {} routes, largest has {} activities",
        groups.len(),
        groups.first().map_or(0, |g| g.activities.len())
    );

    GroupingResult {
        groups,
        activity_matches,
    }
}

/// Parse a JSON array of activities, group them, and return the groups as JSON.
///
/// # Example
/// ```
/// use route_grouper::group_activities_json;
///
/// let json = r#"[{"id": 1, "type": "Ride", "distance": 20000.0}]"#;
/// assert_eq!(group_activities_json(json, 50.0).unwrap(), "[]");
/// ```
pub fn group_activities_json(json: &str, threshold_meters: f64) -> Result<String> {
    let activities: Vec<Activity> = serde_json::from_str(json)?;
    let groups = group_activities(&activities, threshold_meters);
    Ok(serde_json::to_string(&groups)?)
}

/// Only activities of the configured type with a recorded track are grouped.
pub fn is_qualifying(activity: &Activity, config: &GroupingConfig) -> bool {
    activity.activity_type == config.activity_type && activity.track().is_some()
}

/// First-match assignment against each group's representative.
fn assign_groups(
    signatures: &[Option<TrackSignature>],
    threshold_meters: f64,
) -> Vec<PendingGroup> {
    let mut groups: Vec<PendingGroup> = Vec::new();

    for (idx, candidate) in signatures.iter().enumerate() {
        let mut matched = false;

        for group in groups.iter_mut() {
            let similarity = match (candidate, &signatures[group.representative()]) {
                (Some(c), Some(r)) => signature_similarity(c, r),
                _ => SIMILARITY_SENTINEL,
            };

            if similarity < threshold_meters {
                group.members.push(idx);
                group.similarities.push(similarity);
                matched = true;
                break;
            }
        }

        if !matched {
            let id = format!("route-{}", groups.len());
            trace!("[RouteGrouper] Activity #{} starts {}", idx, id);
            groups.push(PendingGroup {
                id,
                members: vec![idx],
                similarities: vec![0.0],
            });
        }
    }

    groups
}

#[cfg(not(feature = "parallel"))]
fn build_signatures(
    activities: &[&Activity],
    config: &GroupingConfig,
) -> Vec<Option<TrackSignature>> {
    activities
        .iter()
        .map(|a| TrackSignature::from_activity(a, config))
        .collect()
}

/// Tracks decode independently; `collect` keeps input order.
#[cfg(feature = "parallel")]
fn build_signatures(
    activities: &[&Activity],
    config: &GroupingConfig,
) -> Vec<Option<TrackSignature>> {
    use rayon::prelude::*;

    activities
        .par_iter()
        .map(|a| TrackSignature::from_activity(a, config))
        .collect()
}
