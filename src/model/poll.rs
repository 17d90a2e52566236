//! Domain models for polls.

use serde::{Deserialize, Serialize};

/// Markers for numbered options, in option order.
pub const NUMBER_MARKERS: [&str; 9] = ["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣"];

/// Markers for the quick yes/no poll.
pub const YES_NO_MARKERS: [&str; 2] = ["👍", "👎"];

pub const MIN_POLL_OPTIONS: usize = 2;
pub const MAX_POLL_OPTIONS: usize = NUMBER_MARKERS.len();

/// Longest allowed poll, one week in minutes.
pub const MAX_POLL_MINUTES: u32 = 10_080;

/// Poll-specific part of a timed unit.
///
/// `options` and `markers` always have the same length; `markers[i]` is the reaction
/// counted as a vote for `options[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollPayload {
    pub question: String,
    pub options: Vec<String>,
    pub markers: Vec<String>,
}

impl PollPayload {
    /// Numbered poll with keycap markers, one per option.
    pub fn numbered(question: String, options: Vec<String>) -> Self {
        let markers = NUMBER_MARKERS
            .iter()
            .take(options.len())
            .map(|m| m.to_string())
            .collect();

        Self {
            question,
            options,
            markers,
        }
    }

    /// Quick poll with the fixed Yes/No pair.
    pub fn yes_no(question: String) -> Self {
        Self {
            question,
            options: vec!["Yes".to_string(), "No".to_string()],
            markers: YES_NO_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Option/marker pairs in display order.
    pub fn choices(&self) -> impl Iterator<Item = (&str, &str)> {
        self.markers
            .iter()
            .zip(self.options.iter())
            .map(|(marker, option)| (marker.as_str(), option.as_str()))
    }
}

/// Which poll variant to create.
#[derive(Debug, Clone)]
pub enum PollChoices {
    /// User-supplied options, 2..=9.
    Numbered(Vec<String>),
    /// Fixed Yes/No.
    YesNo,
}

/// Parameters for creating a poll.
#[derive(Debug, Clone)]
pub struct CreatePollParams {
    pub guild_id: u64,
    pub channel_id: u64,
    pub creator_id: u64,
    pub question: String,
    pub choices: PollChoices,
    pub duration_minutes: u32,
}

/// Final count for one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionResult {
    pub option: String,
    pub votes: u64,
    pub percentage: u64,
}

/// Final poll tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTally {
    pub results: Vec<OptionResult>,
    pub total_votes: u64,
}
