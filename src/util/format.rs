//! Human readable durations for list replies.

use chrono::{DateTime, Utc};

/// Formats the time remaining until `due` as `1d 2h 3m 4s`.
///
/// Leading zero units are dropped, seconds are always shown. Returns
/// `Overdue (will run soon)` when `due` is already behind `now`.
pub fn format_time_left(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let total = (due - now).num_seconds();
    if total < 0 {
        return "Overdue (will run soon)".to_string();
    }

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{}d ", days));
    }
    if hours > 0 || days > 0 {
        out.push_str(&format!("{}h ", hours));
    }
    if minutes > 0 || hours > 0 || days > 0 {
        out.push_str(&format!("{}m ", minutes));
    }
    out.push_str(&format!("{}s", seconds));
    out
}

/// Describes a repeat interval in the largest whole unit, e.g. `2 hours`.
pub fn format_interval(interval_secs: u64) -> String {
    let (value, unit) = if interval_secs % 86_400 == 0 {
        (interval_secs / 86_400, "day")
    } else if interval_secs % 3_600 == 0 {
        (interval_secs / 3_600, "hour")
    } else if interval_secs % 60 == 0 {
        (interval_secs / 60, "minute")
    } else {
        (interval_secs, "second")
    };

    if value == 1 {
        format!("{} {}", value, unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

/// Shortens `text` to `max` characters, appending `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}
