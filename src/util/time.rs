//! Free-text time expressions used by `/schedule`.
//!
//! Grammars are tried in a fixed order and the first match wins. Matching is
//! case-insensitive and anchored at the start of the input only, so trailing text
//! after a recognised expression is ignored. Clock and calendar times are UTC.
//!
//! | Order | Grammar | Result |
//! |---|---|---|
//! | 1 | `in N minute(s)` | once, now + N minutes |
//! | 2 | `in N hour(s)` | once, now + N hours |
//! | 3 | `in N day(s)` | once, now + N days |
//! | 4 | `every N minute(s)` | repeating, N × 60 s |
//! | 5 | `every N hour(s)` | repeating, N × 3600 s |
//! | 6 | `every N day(s)` | repeating, N × 86400 s |
//! | 7 | `HH:MM` | once, next occurrence of that clock time |
//! | 8 | `YYYY-MM-DD HH:MM` | once, that instant |
//!
//! No range validation happens here: `in 0 minutes` and `every 0 hours` parse fine and
//! are rejected by the command layer.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::{Captures, Regex};

/// Result of a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTime {
    /// Fire once at the given instant.
    Once(DateTime<Utc>),
    /// Fire every `interval_secs` seconds.
    Repeating { interval_secs: u64 },
}

type Handler = fn(&Captures<'_>, DateTime<Utc>) -> Option<ParsedTime>;

static PATTERNS: LazyLock<Vec<(Regex, Handler)>> = LazyLock::new(|| {
    let table: [(&str, Handler); 8] = [
        (r"^in (\d+) minutes?", |c, now| in_offset(c, now, 60)),
        (r"^in (\d+) hours?", |c, now| in_offset(c, now, 3_600)),
        (r"^in (\d+) days?", |c, now| in_offset(c, now, 86_400)),
        (r"^every (\d+) minutes?", |c, _| every(c, 60)),
        (r"^every (\d+) hours?", |c, _| every(c, 3_600)),
        (r"^every (\d+) days?", |c, _| every(c, 86_400)),
        (r"^(\d{1,2}):(\d{2})", next_clock_time),
        (r"^(\d{4})-(\d{2})-(\d{2}) (\d{1,2}):(\d{2})", date_time),
    ];

    table
        .into_iter()
        .map(|(pattern, handler)| {
            let regex = Regex::new(&format!("(?i){}", pattern))
                .unwrap_or_else(|e| panic!("invalid time pattern {}: {}", pattern, e));
            (regex, handler)
        })
        .collect()
});

/// Parses `input` relative to `now`.
///
/// # Returns
/// - `Some(ParsedTime)` - The first grammar that matched, evaluated against `now`
/// - `None` - Nothing matched, or the matched fields are out of range
///   (e.g. `25:00`, `2026-02-30 10:00`, numbers that overflow)
pub fn parse_time_expression(input: &str, now: DateTime<Utc>) -> Option<ParsedTime> {
    let input = input.trim();

    for (regex, handler) in PATTERNS.iter() {
        if let Some(captures) = regex.captures(input) {
            return handler(&captures, now);
        }
    }

    None
}

fn number<T: std::str::FromStr>(captures: &Captures<'_>, group: usize) -> Option<T> {
    captures.get(group)?.as_str().parse().ok()
}

fn in_offset(captures: &Captures<'_>, now: DateTime<Utc>, unit_secs: i64) -> Option<ParsedTime> {
    let amount: i64 = number(captures, 1)?;
    let offset = Duration::try_seconds(amount.checked_mul(unit_secs)?)?;

    now.checked_add_signed(offset).map(ParsedTime::Once)
}

fn every(captures: &Captures<'_>, unit_secs: u64) -> Option<ParsedTime> {
    let amount: u64 = number(captures, 1)?;

    Some(ParsedTime::Repeating {
        interval_secs: amount.checked_mul(unit_secs)?,
    })
}

/// Today at HH:MM if that is still strictly ahead of `now`, otherwise tomorrow.
fn next_clock_time(captures: &Captures<'_>, now: DateTime<Utc>) -> Option<ParsedTime> {
    let hour: u32 = number(captures, 1)?;
    let minute: u32 = number(captures, 2)?;

    let today = now.date_naive().and_hms_opt(hour, minute, 0)?.and_utc();
    let next = if today <= now {
        today + Duration::days(1)
    } else {
        today
    };

    Some(ParsedTime::Once(next))
}

fn date_time(captures: &Captures<'_>, _now: DateTime<Utc>) -> Option<ParsedTime> {
    let date = NaiveDate::from_ymd_opt(
        number(captures, 1)?,
        number(captures, 2)?,
        number(captures, 3)?,
    )?;
    let instant = date
        .and_hms_opt(number(captures, 4)?, number(captures, 5)?, 0)?
        .and_utc();

    Some(ParsedTime::Once(instant))
}
