//! Scheduled message record factory.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::factory::helpers::{
    envelope, minutes_from_now, next_id, next_snowflake, once, repeating,
};

/// Factory for scheduled-message records with customizable fields.
///
/// Defaults to a one-shot plain-text message due in one hour.
pub struct ScheduleFactory {
    id: u64,
    guild_id: u64,
    channel_id: u64,
    creator_id: u64,
    due_at: DateTime<Utc>,
    interval_secs: Option<u64>,
    message: String,
    use_embed: bool,
    ended: bool,
}

impl Default for ScheduleFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleFactory {
    pub fn new() -> Self {
        Self {
            // Schedule ids are creation timestamps rather than message ids.
            id: 1_700_000_000 + next_id(),
            guild_id: next_snowflake(),
            channel_id: next_snowflake(),
            creator_id: next_snowflake(),
            due_at: minutes_from_now(60),
            interval_secs: None,
            message: "Scheduled test message".to_string(),
            use_embed: false,
            ended: false,
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn guild_id(mut self, guild_id: u64) -> Self {
        self.guild_id = guild_id;
        self
    }

    pub fn channel_id(mut self, channel_id: u64) -> Self {
        self.channel_id = channel_id;
        self
    }

    pub fn due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = due_at;
        self
    }

    /// Sets the due time relative to now; negative values make the schedule overdue.
    pub fn due_in_minutes(mut self, minutes: i64) -> Self {
        self.due_at = minutes_from_now(minutes);
        self
    }

    /// Makes the schedule repeat every `interval_secs` seconds.
    pub fn repeating(mut self, interval_secs: u64) -> Self {
        self.interval_secs = Some(interval_secs);
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }

    pub fn use_embed(mut self, use_embed: bool) -> Self {
        self.use_embed = use_embed;
        self
    }

    pub fn ended(mut self) -> Self {
        self.ended = true;
        self
    }

    /// Builds the record.
    ///
    /// # Returns
    /// - `Value` - Schedule record in store format
    pub fn build(self) -> Value {
        let fire_policy = match self.interval_secs {
            Some(interval_secs) => repeating(interval_secs, self.due_at),
            None => once(self.due_at),
        };

        envelope(
            self.id,
            self.guild_id,
            self.channel_id,
            self.creator_id,
            self.ended,
            fire_policy,
            json!({
                "kind": "schedule",
                "message": self.message,
                "use_embed": self.use_embed,
            }),
        )
    }
}

/// Creates an active one-shot schedule record in `guild_id` with default values.
pub fn create_schedule(guild_id: u64) -> Value {
    ScheduleFactory::new().guild_id(guild_id).build()
}
