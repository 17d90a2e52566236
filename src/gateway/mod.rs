//! Chat platform contract used by the resolvers and the command layer.
//!
//! Everything above this module talks to Discord through the `Gateway` trait using
//! plain ids and domain `Card`s. `discord` implements it on serenity's `Http` client;
//! tests use the recording `mock::MockGateway`.

pub mod card;
pub mod discord;

#[cfg(test)]
pub mod mock;

use std::collections::HashSet;

use serenity::async_trait;

use crate::{error::AppError, gateway::card::Card};

/// A message the bot posted, addressed by channel and message id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub channel_id: u64,
    pub message_id: u64,
}

impl MessageRef {
    pub fn new(channel_id: u64, message_id: u64) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }
}

/// Message body to post.
#[derive(Debug, Clone, PartialEq)]
pub enum Outgoing {
    Text(String),
    Card(Card),
}

/// Operations the timed features need from the chat platform.
///
/// Every method may fail with `AppError::GatewayErr`; rendering a card can also fail
/// with `AppError::InternalErr` when a timestamp is out of the platform's range.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Posts a message to a channel.
    ///
    /// # Returns
    /// - `Ok(MessageRef)` - Reference to the posted message
    /// - `Err(AppError)` - The channel is gone, the bot lacks permission, or the request failed
    async fn send_message(&self, channel_id: u64, message: Outgoing)
        -> Result<MessageRef, AppError>;

    /// Replaces the card of a message the bot posted earlier.
    async fn edit_message(&self, message: MessageRef, card: Card) -> Result<(), AppError>;

    /// Adds the bot's own reaction so members can click it.
    async fn add_marker(&self, message: MessageRef, marker: &str) -> Result<(), AppError>;

    /// Every user who reacted with `marker`, the bot included.
    ///
    /// Fetches all pages of reactors.
    async fn get_reactors(
        &self,
        message: MessageRef,
        marker: &str,
    ) -> Result<HashSet<u64>, AppError>;

    /// Reaction count for `marker` as reported by the platform, the bot's seed reaction
    /// included. A marker nobody reacted with counts as zero.
    async fn count_reactions(&self, message: MessageRef, marker: &str) -> Result<u64, AppError>;

    /// Checks that a channel exists and is visible to the bot.
    ///
    /// # Returns
    /// - `Ok(())` - The channel exists
    /// - `Err(AppError::GatewayErr(GatewayError::NotFound))` - No such channel
    async fn fetch_channel(&self, channel_id: u64) -> Result<(), AppError>;

    /// User id of the bot account.
    fn bot_user_id(&self) -> u64;
}
