//! Poll record factory.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::factory::helpers::{envelope, minutes_from_now, next_snowflake, once};

const NUMBER_MARKERS: [&str; 9] = ["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣"];

/// Factory for poll records with customizable fields.
///
/// Defaults to a numbered two-option poll. Use `yes_no()` for a quick poll.
pub struct PollFactory {
    id: u64,
    guild_id: u64,
    channel_id: u64,
    creator_id: u64,
    ends_at: DateTime<Utc>,
    question: String,
    options: Vec<String>,
    markers: Vec<String>,
}

impl Default for PollFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PollFactory {
    pub fn new() -> Self {
        Self {
            id: next_snowflake(),
            guild_id: next_snowflake(),
            channel_id: next_snowflake(),
            creator_id: next_snowflake(),
            ends_at: minutes_from_now(60),
            question: "Test question?".to_string(),
            options: vec!["First".to_string(), "Second".to_string()],
            markers: NUMBER_MARKERS[..2].iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Sets the poll message id, which is also the poll id.
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

    pub fn ends_at(mut self, ends_at: DateTime<Utc>) -> Self {
        self.ends_at = ends_at;
        self
    }

    /// Sets the end time relative to now; negative values make the poll overdue.
    pub fn due_in_minutes(mut self, minutes: i64) -> Self {
        self.ends_at = minutes_from_now(minutes);
        self
    }

    pub fn question(mut self, question: &str) -> Self {
        self.question = question.to_string();
        self
    }

    /// Sets numbered options, pairing each with the next number marker.
    pub fn options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self.markers = NUMBER_MARKERS
            .iter()
            .take(options.len())
            .map(|m| m.to_string())
            .collect();
        self
    }

    /// Turns the poll into a yes/no quick poll.
    pub fn yes_no(mut self) -> Self {
        self.options = vec!["Yes".to_string(), "No".to_string()];
        self.markers = vec!["👍".to_string(), "👎".to_string()];
        self
    }

    /// Builds the record.
    ///
    /// # Returns
    /// - `Value` - Poll record in store format
    pub fn build(self) -> Value {
        envelope(
            self.id,
            self.guild_id,
            self.channel_id,
            self.creator_id,
            false,
            once(self.ends_at),
            json!({
                "kind": "poll",
                "question": self.question,
                "options": self.options,
                "markers": self.markers,
            }),
        )
    }
}

/// Creates an active poll record in `guild_id` with default values.
pub fn create_poll(guild_id: u64) -> Value {
    PollFactory::new().guild_id(guild_id).build()
}
