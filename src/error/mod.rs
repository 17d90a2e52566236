//! Error types and caller-facing error text.
//!
//! This module provides the bot's error hierarchy. The `AppError` enum is the
//! top-level error type wrapping the domain-specific errors, and `user_message`
//! decides what part of an error may be shown to the person who ran a command.

pub mod config;
pub mod gateway;
pub mod internal;
pub mod validation;

use thiserror::Error;

use crate::error::{
    config::ConfigError, gateway::GatewayError, internal::InternalError,
    validation::ValidationError,
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the bot. Most variants use
/// `#[from]` for automatic error conversion so `?` can be used throughout the service
/// and data layers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// The caller asked for something invalid. Shown to them verbatim.
    #[error(transparent)]
    ValidationErr(#[from] ValidationError),

    /// A chat platform call failed.
    #[error(transparent)]
    GatewayErr(#[from] GatewayError),

    /// Unexpected internal failure.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Reading or writing a store file failed.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A store file could not be encoded or decoded.
    #[error("Store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Discord client error from Serenity.
    ///
    /// Boxed due to large size. Only raised while building or running the client;
    /// request failures are classified into `GatewayErr` instead.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Text to send back to the command caller.
    ///
    /// Validation errors are returned verbatim. Everything else is logged with full
    /// detail and replaced by a generic message to avoid leaking internals.
    pub fn user_message(&self) -> String {
        match self {
            Self::ValidationErr(err) => err.to_string(),
            Self::GatewayErr(GatewayError::Forbidden(_)) => {
                "I don't have the required permissions to perform this action.".to_string()
            }
            err => {
                tracing::error!("Command error: {}", err);
                "An error occurred while processing this command.".to_string()
            }
        }
    }
}
