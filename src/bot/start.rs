use serenity::all::{Client, GatewayIntents};

use crate::{bot::handler::Handler, config::Config, error::AppError, state::AppState};

/// Builds the Discord client with its event handler.
///
/// # Arguments
/// - `config` - Application configuration holding the bot token
/// - `state` - Shared state handed to the event handler
///
/// # Returns
/// - `Ok(Client)` - Client ready to be started
/// - `Err(AppError)` - Client construction failed
pub async fn init_bot(config: &Config, state: AppState) -> Result<Client, AppError> {
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGE_REACTIONS;

    let client = Client::builder(&config.discord_token, intents)
        .event_handler(Handler::new(state))
        .await?;

    Ok(client)
}

/// Starts the Discord bot in a blocking manner
///
/// Runs until the gateway connection shuts down, so call it from its own task.
///
/// # Returns
/// - `Ok(())` - The bot shut down cleanly
/// - `Err(AppError)` - Connecting to the gateway failed
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
