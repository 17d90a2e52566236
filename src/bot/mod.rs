//! Discord bot integration: the event handler and slash commands.
//!
//! The bot runs in its own tokio task. Its gateway connection only delivers
//! interactions and the ready event; every message the engine posts goes through
//! the `Gateway` adapter over a separate HTTP client.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Receive guild and channel information for slash commands
//! - `GUILD_MESSAGE_REACTIONS` - Keep reaction data on announcements available

pub mod commands;
pub mod handler;
pub mod start;
