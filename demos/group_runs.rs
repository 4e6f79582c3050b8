//! Group a list of activities into familiar routes and print each route's progress.
//!
//! Usage:
//!   cargo run --example group_runs -- [activities.json] [threshold_meters]
//!
//! Without a file, a small synthetic history is used.

use std::env;
use std::fs;

use route_grouper::{
    encode_track, filter_by_min_activities, group_activities, route_progress, summarize_progress,
    Activity, GpsPoint, DEFAULT_SIMILARITY_THRESHOLD,
};

fn synthetic_history() -> Vec<Activity> {
    let loop_track = |offset: f64| -> String {
        let points: Vec<GpsPoint> = (0..120)
            .map(|i| {
                let angle = i as f64 / 120.0 * std::f64::consts::TAU;
                GpsPoint::new(
                    46.5197 + 0.008 * angle.sin(),
                    6.6323 + 0.012 * angle.cos() + offset,
                )
            })
            .collect();
        encode_track(&points, 5).unwrap_or_default()
    };
    let river_track: Vec<GpsPoint> = (0..80)
        .map(|i| GpsPoint::new(46.50 + i as f64 * 0.0004, 6.58))
        .collect();
    let river_track = encode_track(&river_track, 5).unwrap_or_default();

    let speeds = [2.9, 3.0, 3.05, 3.1, 3.2];
    let mut activities = Vec::new();
    for (week, speed) in speeds.iter().enumerate() {
        activities.push(
            Activity::new(week as u64 * 2, "Run", 5600.0 + week as f64 * 15.0)
                .with_track(&loop_track(week as f64 * 0.00003))
                .with_heart_rate(150.0 - week as f64)
                .with_average_speed(*speed)
                .with_start_date(&format!("2024-05-{:02}T07:00:00Z", week * 7 + 1)),
        );
        if week % 2 == 0 {
            activities.push(
                Activity::new(week as u64 * 2 + 1, "Run", 3500.0)
                    .with_track(&river_track)
                    .with_average_speed(3.3)
                    .with_start_date(&format!("2024-05-{:02}T18:00:00Z", week * 7 + 3)),
            );
        }
    }
    activities
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let activities: Vec<Activity> = match args.get(1) {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => synthetic_history(),
    };
    let threshold = match args.get(2) {
        Some(raw) => raw.parse()?,
        None => DEFAULT_SIMILARITY_THRESHOLD,
    };

    let groups = filter_by_min_activities(group_activities(&activities, threshold), 2);
    println!(
        "{} activities -> {} repeated routes at {:.0}m",
        activities.len(),
        groups.len(),
        threshold
    );

    for group in &groups {
        let summary = summarize_progress(&route_progress(group));
        let heart_rate = match group.average_heart_rate {
            Some(hr) => format!("{:.0} bpm", hr),
            None => "n/a".to_string(),
        };
        println!(
            "{}: {} runs, {:.2} km, HR {}, center ({:.5}, {:.5})",
            group.id,
            group.activities.len(),
            group.average_distance / 1000.0,
            heart_rate,
            group.center_point.latitude,
            group.center_point.longitude,
        );
        if let (Some(best), Some(change)) = (summary.best_pace, summary.pace_change) {
            println!("    best pace {best:.2} min/km, change {change:+.2} min/km");
        }
    }

    Ok(())
}
