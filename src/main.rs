mod bot;
mod config;
mod data;
mod error;
mod gateway;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use std::sync::Arc;

use crate::{
    config::Config, data::store::JsonStore, error::AppError, gateway::discord::DiscordGateway,
    scheduler::{sweep, Scheduler}, service::resolver::OutcomeResolver, state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let store = Arc::new(JsonStore::new(config.data_dir.clone()));
    tracing::info!("Using data directory {}", store.dir().display());

    let (http, bot_user_id) = startup::connect_discord_http(&config).await?;
    let gateway = Arc::new(DiscordGateway::new(http, bot_user_id));

    let resolver = Arc::new(OutcomeResolver::new(store.clone(), gateway.clone()));
    let scheduler = Scheduler::new(store.clone(), resolver);

    // Timers are resumed from the ready handler once commands are registered.
    sweep::start_sweep(scheduler.clone()).await?;

    let state = AppState::new(store, gateway, scheduler);
    let client = bot::start::init_bot(&config, state).await?;

    bot::start::start_bot(client).await
}
