use std::sync::Arc;

use serenity::http::Http;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::AppError};

const DEFAULT_LOG_FILTER: &str = "herald=info";

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `herald=info` filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .init();
}

/// Creates the HTTP client used by the gateway adapter and looks up the bot account.
///
/// The bot's user id is needed to discount its own seed reactions when counting.
///
/// # Arguments
/// - `config` - Application configuration holding the bot token
///
/// # Returns
/// - `Ok((Arc<Http>, u64))` - The client and the bot's user id
/// - `Err(AppError)` - The token was rejected or Discord was unreachable
pub async fn connect_discord_http(config: &Config) -> Result<(Arc<Http>, u64), AppError> {
    let http = Arc::new(Http::new(&config.discord_token));
    let bot_user = http.get_current_user().await?;

    tracing::info!("Authenticated as {} ({})", bot_user.name, bot_user.id);

    Ok((http, bot_user.id.get()))
}
