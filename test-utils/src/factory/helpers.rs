//! Shared helper utilities for factory methods.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

/// Counter for generating unique IDs in tests.
///
/// This atomic counter ensures each factory-created record gets a unique
/// identifier to prevent collisions in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Offset that makes generated ids snowflake-sized, above 2^53, so a lossy numeric
/// round-trip through a float would be caught.
const SNOWFLAKE_BASE: u64 = 1_100_000_000_000_000_000;

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Gets the next unique snowflake-sized id.
pub fn next_snowflake() -> u64 {
    SNOWFLAKE_BASE + next_id()
}

/// Instant `minutes` from now; negative values give past instants.
pub fn minutes_from_now(minutes: i64) -> DateTime<Utc> {
    Utc::now() + Duration::minutes(minutes)
}

/// Shared envelope of every stored unit.
///
/// # Arguments
/// - `id`, `guild_id`, `channel_id`, `creator_id` - Written as decimal strings
/// - `ended` - Writes `"ended"` instead of `"active"` as the state
/// - `fire_policy` - Already-encoded fire policy object
/// - `payload` - Already-encoded payload object including its `kind` tag
pub(crate) fn envelope(
    id: u64,
    guild_id: u64,
    channel_id: u64,
    creator_id: u64,
    ended: bool,
    fire_policy: Value,
    payload: Value,
) -> Value {
    json!({
        "id": id.to_string(),
        "guild_id": guild_id.to_string(),
        "channel_id": channel_id.to_string(),
        "creator_id": creator_id.to_string(),
        "created_at": Utc::now().to_rfc3339(),
        "state": if ended { "ended" } else { "active" },
        "fire_policy": fire_policy,
        "payload": payload,
    })
}

/// One-shot fire policy due at `at`.
pub(crate) fn once(at: DateTime<Utc>) -> Value {
    json!({ "type": "once", "at": at.to_rfc3339() })
}

/// Repeating fire policy next due at `next_fire_at`.
pub(crate) fn repeating(interval_secs: u64, next_fire_at: DateTime<Utc>) -> Value {
    json!({
        "type": "repeating",
        "interval_secs": interval_secs,
        "next_fire_at": next_fire_at.to_rfc3339(),
    })
}
