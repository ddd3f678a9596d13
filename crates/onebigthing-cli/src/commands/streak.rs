use chrono::{DateTime, FixedOffset};
use onebigthing_core::Config;
use serde::Serialize;

use crate::context::{open_store, print_json, tracker, CliResult};

#[derive(Serialize)]
struct StreakReport {
    streak: u32,
    weekly_completion: [u8; 7],
    week_start: chrono::NaiveDate,
    /// Legacy all-time counter kept for older data.
    legacy_streak: u32,
}

pub fn run(config: &Config, now: DateTime<FixedOffset>) -> CliResult {
    let mut tracker = tracker(open_store()?, config);
    let snapshot = tracker.refresh_streak(now)?;
    let report = StreakReport {
        streak: snapshot.streak,
        weekly_completion: snapshot.weekly_completion,
        week_start: snapshot.week_start,
        legacy_streak: tracker.store().get_streak()?,
    };
    print_json(&report)
}
