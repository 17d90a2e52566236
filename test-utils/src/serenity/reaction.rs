//! Test factory for creating Serenity MessageReaction objects.

use serenity::all::MessageReaction;

/// Creates a reaction summary as it appears on a fetched message.
///
/// # Arguments
/// - `emoji` - Unicode emoji of the reaction
/// - `count` - Total number of users who reacted
/// - `me` - Whether the bot is one of them
///
/// # Panics
/// - If the JSON cannot be deserialized into a MessageReaction (indicates invalid test data)
pub fn create_test_reaction(emoji: &str, count: u64, me: bool) -> MessageReaction {
    serde_json::from_value(serde_json::json!({
        "count": count,
        "count_details": { "burst": 0, "normal": count },
        "me": me,
        "me_burst": false,
        "emoji": { "id": null, "name": emoji },
        "burst_colors": [],
    }))
    .expect("Failed to create test reaction - invalid JSON structure")
}
