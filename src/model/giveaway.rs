//! Domain models for giveaways.

use serde::{Deserialize, Serialize};

/// Reaction members click to enter a giveaway.
pub const GIVEAWAY_MARKER: &str = "🎉";

/// Upper bound on winners per draw.
pub const MAX_WINNERS: u32 = 20;

/// Longest allowed giveaway, four weeks in minutes.
pub const MAX_GIVEAWAY_MINUTES: u32 = 40_320;

/// Giveaway-specific part of a timed unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiveawayPayload {
    /// What is being given away.
    pub prize: String,
    /// Number of winners to draw, 1..=20.
    pub winner_count: u32,
    /// Optional text shown on the announcement card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reaction counted as an entry.
    pub marker: String,
    /// Winners of the final draw. Absent until a draw succeeds.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::util::snowflake::option_list"
    )]
    pub winner_ids: Option<Vec<u64>>,
    /// Message announcing the winners.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::util::snowflake::option"
    )]
    pub winners_message_id: Option<u64>,
}

/// Parameters for starting a new giveaway.
#[derive(Debug, Clone)]
pub struct CreateGiveawayParams {
    pub guild_id: u64,
    pub channel_id: u64,
    pub host_id: u64,
    pub prize: String,
    pub winner_count: u32,
    pub duration_minutes: u32,
    pub description: Option<String>,
}

/// Result of drawing winners from the current participant pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawResult {
    /// Enough participants; the sampled winners in draw order.
    Winners(Vec<u64>),
    /// Fewer participants than requested winners.
    Insufficient { needed: u32, participants: usize },
    /// Nobody holds the entry marker any more, not even the bot's seed reaction.
    MarkerRemoved,
}
