//! Unlock-window arithmetic and display formatting.
//!
//! An explicit unlock opens a fixed 60-minute window. On restore, the
//! server-reported unlock time is reconciled against the clock to decide
//! how much of the window is left.

use chrono::{DateTime, Utc};

/// Minutes an explicit unlock lasts before auto-lock.
pub const UNLOCK_WINDOW_MINUTES: u32 = 60;

/// Minutes left in a host's unlock window given the server-reported
/// unlock time (epoch seconds).
///
/// Elapsed time is floored to whole minutes; a window that has fully
/// elapsed yields zero. Clock skew that puts the unlock in the future
/// counts as a full window.
pub fn remaining_minutes(unlock_timestamp_secs: i64, now_secs: i64) -> u32 {
    let elapsed_minutes = (now_secs - unlock_timestamp_secs).div_euclid(60);
    if elapsed_minutes <= 0 {
        return UNLOCK_WINDOW_MINUTES;
    }
    (i64::from(UNLOCK_WINDOW_MINUTES) - elapsed_minutes).max(0) as u32
}

/// Renders a countdown as "1h 5m" or "45m".
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Relative rendering of an RFC 3339 timestamp ("Just now", "5m ago",
/// "3h ago", "2d ago", then a date past a week). Unparseable input is
/// echoed back unchanged.
pub fn format_relative(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_rfc3339(timestamp) else {
        return timestamp.to_string();
    };

    let diff = now.signed_duration_since(then);
    let minutes = diff.num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = diff.num_hours();
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    let days = diff.num_days();
    if days < 7 {
        return format!("{}d ago", days);
    }
    then.format("%Y-%m-%d %H:%M").to_string()
}

fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
