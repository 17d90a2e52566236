//! Domain models for scheduled messages.

use serde::{Deserialize, Serialize};

/// Scheduled-message part of a timed unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePayload {
    /// Text to deliver.
    pub message: String,
    /// Deliver as a rich card instead of plain text.
    pub use_embed: bool,
}

/// Parameters for creating a scheduled message.
#[derive(Debug, Clone)]
pub struct CreateScheduleParams {
    pub guild_id: u64,
    /// Channel the message is delivered to.
    pub channel_id: u64,
    pub creator_id: u64,
    /// Free-text time expression, e.g. `in 10 minutes` or `every 2 hours`.
    pub time: String,
    pub message: String,
    pub repeat: bool,
    pub use_embed: bool,
}
