//! Giveaway record factory.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::factory::helpers::{envelope, minutes_from_now, next_snowflake, once};

/// Factory for giveaway records with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let record = GiveawayFactory::new()
///     .guild_id(42)
///     .prize("Steam key")
///     .winner_count(3)
///     .ended_with_winners(&[7, 8, 9])
///     .build();
/// ```
pub struct GiveawayFactory {
    id: u64,
    guild_id: u64,
    channel_id: u64,
    host_id: u64,
    ends_at: DateTime<Utc>,
    prize: String,
    winner_count: u32,
    description: Option<String>,
    ended: bool,
    winner_ids: Option<Vec<u64>>,
}

impl Default for GiveawayFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl GiveawayFactory {
    /// Creates a factory for an active one-winner giveaway ending in one hour.
    pub fn new() -> Self {
        Self {
            id: next_snowflake(),
            guild_id: next_snowflake(),
            channel_id: next_snowflake(),
            host_id: next_snowflake(),
            ends_at: minutes_from_now(60),
            prize: "Test Prize".to_string(),
            winner_count: 1,
            description: None,
            ended: false,
            winner_ids: None,
        }
    }

    /// Sets the announcement message id, which is also the giveaway id.
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

    pub fn host_id(mut self, host_id: u64) -> Self {
        self.host_id = host_id;
        self
    }

    pub fn ends_at(mut self, ends_at: DateTime<Utc>) -> Self {
        self.ends_at = ends_at;
        self
    }

    /// Sets the end time relative to now; negative values make the giveaway overdue.
    pub fn due_in_minutes(mut self, minutes: i64) -> Self {
        self.ends_at = minutes_from_now(minutes);
        self
    }

    pub fn prize(mut self, prize: &str) -> Self {
        self.prize = prize.to_string();
        self
    }

    pub fn winner_count(mut self, winner_count: u32) -> Self {
        self.winner_count = winner_count;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Marks the giveaway as ended with no recorded winners.
    pub fn ended(mut self) -> Self {
        self.ended = true;
        self
    }

    /// Marks the giveaway as ended with the given winners recorded.
    pub fn ended_with_winners(mut self, winner_ids: &[u64]) -> Self {
        self.ended = true;
        self.winner_ids = Some(winner_ids.to_vec());
        self
    }

    /// Builds the record.
    ///
    /// # Returns
    /// - `Value` - Giveaway record in store format
    pub fn build(self) -> Value {
        let mut payload = Map::new();
        payload.insert("kind".into(), json!("giveaway"));
        payload.insert("prize".into(), json!(self.prize));
        payload.insert("winner_count".into(), json!(self.winner_count));
        payload.insert("marker".into(), json!("🎉"));
        if let Some(description) = self.description {
            payload.insert("description".into(), json!(description));
        }
        if let Some(winner_ids) = self.winner_ids {
            let ids: Vec<String> = winner_ids.iter().map(u64::to_string).collect();
            payload.insert("winner_ids".into(), json!(ids));
        }

        envelope(
            self.id,
            self.guild_id,
            self.channel_id,
            self.host_id,
            self.ended,
            once(self.ends_at),
            Value::Object(payload),
        )
    }
}

/// Creates an active giveaway record in `guild_id` with default values.
pub fn create_giveaway(guild_id: u64) -> Value {
    GiveawayFactory::new().guild_id(guild_id).build()
}
