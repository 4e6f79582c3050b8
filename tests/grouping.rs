//! Tests for route grouping through the public API

use route_grouper::similarity::signature_similarity;
use route_grouper::{
    encode_track, filter_by_min_activities, group_activities, group_activities_with_matches,
    route_similarity, Activity, GpsPoint, GroupingConfig, TrackSignature, SIMILARITY_SENTINEL,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A ~2.4km northbound track starting at (lat, lng), one point every ~33m
fn create_track(lat: f64, lng: f64) -> Vec<GpsPoint> {
    (0..75)
        .map(|i| GpsPoint::new(lat + i as f64 * 0.0003, lng))
        .collect()
}

fn run(id: u64, distance: f64, track: &[GpsPoint]) -> Activity {
    Activity::new(id, "Run", distance).with_track(&encode_track(track, 5).unwrap())
}

/// Five routes far apart, each run a few times with small GPS jitter
fn mixed_activities() -> Vec<Activity> {
    let bases = [
        (51.5074, -0.1278),
        (48.8566, 2.3522),
        (51.5200, -0.1000),
        (40.7128, -74.0060),
        (46.5197, 6.6323),
    ];
    let mut activities = Vec::new();
    let mut id = 0;
    for round in 0..3 {
        for (i, (lat, lng)) in bases.iter().enumerate() {
            if round == 2 && i % 2 == 1 {
                continue;
            }
            // ~0-7m east-west jitter per repetition
            let jitter = round as f64 * 0.00005;
            let track = create_track(*lat, lng + jitter);
            activities.push(run(id, 2400.0 + i as f64 * 10.0, &track));
            id += 1;
        }
    }
    let ride_track = encode_track(&create_track(51.5074, -0.1278), 5).unwrap();
    activities.push(Activity::new(id, "Ride", 20_000.0).with_track(&ride_track));
    activities.push(Activity::new(id + 1, "Run", 5000.0));
    activities
}

#[test]
fn test_literal_scenario() {
    init_logging();

    let t = create_track(46.5197, 6.6323);
    // Same route shifted ~3m east
    let t_near: Vec<GpsPoint> = t
        .iter()
        .map(|p| GpsPoint::new(p.latitude, p.longitude + 0.00004))
        .collect();
    let t_far = create_track(46.60, 6.70);

    let a = run(1, 5000.0, &t).with_heart_rate(150.0);
    let b = run(2, 5200.0, &t_near).with_heart_rate(155.0);
    let c = run(3, 8000.0, &t_far);

    let groups = group_activities(&[a, b, c], 50.0);

    assert_eq!(groups.len(), 2);

    let first = &groups[0];
    let ids: Vec<u64> = first.activities.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(first.average_distance, 5100.0);
    assert_eq!(first.average_heart_rate, Some(152.5));

    let second = &groups[1];
    assert_eq!(second.activities.len(), 1);
    assert_eq!(second.activities[0].id, 3);
    assert_eq!(second.average_distance, 8000.0);
    assert_eq!(second.average_heart_rate, None);

    // Null heart rate is serialized, not omitted
    let json = serde_json::to_value(second).unwrap();
    assert!(json.get("average_heart_rate").unwrap().is_null());
}

#[test]
fn test_partition_property() {
    let activities = mixed_activities();
    let groups = group_activities(&activities, 50.0);

    let mut grouped: Vec<u64> = groups
        .iter()
        .flat_map(|g| g.activities.iter().map(|a| a.id))
        .collect();
    grouped.sort_unstable();

    let mut expected: Vec<u64> = activities
        .iter()
        .filter(|a| a.activity_type == "Run" && a.track().is_some())
        .map(|a| a.id)
        .collect();
    expected.sort_unstable();

    assert_eq!(grouped, expected);
    assert!(groups.iter().all(|g| !g.activities.is_empty()));
}

#[test]
fn test_mixed_activities_grouped_per_location() {
    let groups = group_activities(&mixed_activities(), 50.0);

    assert_eq!(groups.len(), 5);
    let sizes: Vec<usize> = groups.iter().map(|g| g.activities.len()).collect();
    assert_eq!(sizes, vec![3, 3, 3, 2, 2]);
    // Equal sizes keep creation order
    let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["route-0", "route-2", "route-4", "route-1", "route-3"]
    );
}

#[test]
fn test_grouping_deterministic() {
    let activities = mixed_activities();

    let results: Vec<Vec<(String, Vec<u64>)>> = (0..5)
        .map(|_| {
            group_activities(&activities, 50.0)
                .into_iter()
                .map(|g| (g.id, g.activities.iter().map(|a| a.id).collect()))
                .collect()
        })
        .collect();

    for result in &results[1..] {
        assert_eq!(result, &results[0]);
    }
}

#[test]
fn test_threshold_monotonicity() {
    let activities = mixed_activities();

    let mut previous = usize::MAX;
    for threshold in [1.0, 5.0, 10.0, 50.0, 500.0, 5_000.0, 50_000.0, 10_000_000.0] {
        let count = group_activities(&activities, threshold).len();
        assert!(
            count <= previous,
            "threshold {} produced {} groups, more than {}",
            threshold,
            count,
            previous
        );
        previous = count;
    }
    assert_eq!(previous, 1);
}

#[test]
fn test_self_similarity_is_zero() {
    let config = GroupingConfig::default();
    let activity = run(1, 2400.0, &create_track(51.5074, -0.1278));
    let copy = Activity {
        id: 2,
        ..activity.clone()
    };

    assert_eq!(route_similarity(&activity, &copy, &config), 0.0);

    // Any positive threshold groups them
    let groups = group_activities(&[activity, copy], 0.001);
    assert_eq!(groups.len(), 1);
}

#[test]
fn test_candidate_measured_against_representative() {
    // The short run covers the first ~440m of the long one
    let long: Vec<GpsPoint> = (0..200)
        .map(|i| GpsPoint::new(51.5 + i as f64 * 0.0002, -0.12))
        .collect();
    let short = long[..50].to_vec();

    let short_run = run(1, 1100.0, &short);
    let long_run = run(2, 4400.0, &long);

    // Long candidate vs short representative: most of it is far away
    let groups = group_activities(&[short_run.clone(), long_run.clone()], 50.0);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].activities[0].id, 1);
    assert_eq!(groups[1].activities[0].id, 2);

    // Short candidate vs long representative: every sample lies on it
    let config = GroupingConfig::default();
    let result = group_activities_with_matches(&[long_run, short_run], 50.0, &config);
    assert_eq!(result.groups.len(), 1);
    let ids: Vec<u64> = result.groups[0].activities.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![2, 1]);
    let matches = &result.activity_matches["route-0"];
    assert!(matches[1].similarity < 1.0);
}

#[test]
fn test_sentinel_never_joins() {
    let config = GroupingConfig::default();
    let tracked = run(1, 2400.0, &create_track(51.5074, -0.1278));
    let untracked = Activity::new(2, "Run", 2400.0);

    assert_eq!(
        route_similarity(&untracked, &tracked, &config),
        SIMILARITY_SENTINEL
    );
    assert_eq!(
        route_similarity(&tracked, &untracked, &config),
        SIMILARITY_SENTINEL
    );

    // Present in input but never grouped
    let groups = group_activities(&[tracked, untracked], f64::MAX);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].activities.len(), 1);
}

#[test]
fn test_singletons_keep_creation_order() {
    let activities = vec![
        run(10, 1000.0, &create_track(51.5074, -0.1278)),
        run(20, 1000.0, &create_track(48.8566, 2.3522)),
    ];

    let groups = group_activities(&activities, 50.0);
    let ids: Vec<u64> = groups.iter().map(|g| g.activities[0].id).collect();
    assert_eq!(ids, vec![10, 20]);
}

#[test]
fn test_empty_input() {
    assert!(group_activities(&[], 50.0).is_empty());

    let result = group_activities_with_matches(&[], 50.0, &GroupingConfig::default());
    assert!(result.groups.is_empty());
    assert!(result.activity_matches.is_empty());
}

#[test]
fn test_no_qualifying_activities() {
    let activities = vec![
        Activity::new(1, "Ride", 20_000.0)
            .with_track(&encode_track(&create_track(51.5, -0.12), 5).unwrap()),
        Activity::new(2, "Run", 5000.0),
    ];
    assert!(group_activities(&activities, 50.0).is_empty());
}

#[test]
fn test_center_point_from_start_or_track() {
    let track = create_track(46.5197, 6.6323);
    let with_start = run(1, 2400.0, &track).with_start(GpsPoint::new(46.5, 6.6));
    let without_start = run(2, 2400.0, &create_track(40.7128, -74.0060));

    let groups = group_activities(&[with_start, without_start], 50.0);
    assert_eq!(groups[0].center_point, GpsPoint::new(46.5, 6.6));

    // Track midpoint: index 75 / 2 = 37
    let center = groups[1].center_point;
    assert!((center.latitude - (40.7128 + 37.0 * 0.0003)).abs() < 1e-5);
    assert!((center.longitude + 74.0060).abs() < 1e-5);
}

#[test]
fn test_sample_stride_is_configurable() {
    let config = GroupingConfig {
        sample_stride: 1,
        ..GroupingConfig::default()
    };
    let activity = run(1, 2400.0, &create_track(51.5074, -0.1278));

    let dense = TrackSignature::from_activity(&activity, &config).unwrap();
    let sparse = TrackSignature::from_activity(&activity, &GroupingConfig::default()).unwrap();
    assert_eq!(dense.points.len(), 75);
    assert_eq!(sparse.points.len(), 8);
    // Every dense point is at most 5 samples (~167m) from a sparse one
    let d = signature_similarity(&dense, &sparse);
    assert!(d > 0.0 && d < 170.0);
}

#[test]
fn test_min_activity_filter_after_grouping() {
    let groups = group_activities(&mixed_activities(), 50.0);
    let frequent = filter_by_min_activities(groups, 3);
    assert_eq!(frequent.len(), 3);
    assert!(frequent.iter().all(|g| g.activities.len() >= 3));
}
