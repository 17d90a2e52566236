//! Ready event handler for bot initialization.
//!
//! The ready event fires after every successful gateway handshake, including
//! reconnects. Both tasks done here are safe to repeat: command registration
//! overwrites the previous set, and resuming only arms units that have no timer.

use serenity::all::{ActivityData, Command, Context, Ready};

use crate::{bot::commands, state::AppState};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `state` - Shared state holding the scheduler to resume
/// - `ctx` - Discord context used to register commands and set activity
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &AppState, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    ctx.set_activity(Some(ActivityData::custom("Counting down")));

    match Command::set_global_commands(&ctx.http, commands::all_commands()).await {
        Ok(registered) => tracing::info!("Registered {} slash commands", registered.len()),
        Err(e) => tracing::error!("Failed to register slash commands: {}", e),
    }

    if let Err(e) = state.scheduler.resume_all().await {
        tracing::error!("Failed to resume timed units: {}", e);
    }
}
