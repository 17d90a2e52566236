use serenity::http::HttpError;
use thiserror::Error;

/// Failures reported by the chat platform.
///
/// None of these are retried. `NotFound` and `Forbidden` mean the target can never be
/// served again; `Transient` covers rate limits and momentary outages, which are still
/// treated as a failed fire.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The channel, message or reaction target no longer exists.
    #[error("Target not found: {0}")]
    NotFound(String),

    /// The bot lacks permission to act on the target.
    #[error("Missing permissions: {0}")]
    Forbidden(String),

    /// Any other platform failure.
    #[error("Discord request failed: {0}")]
    Transient(String),
}

impl GatewayError {
    /// Whether the target is gone for good.
    pub fn is_missing_target(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Classifies a serenity error by the HTTP status Discord answered with.
impl From<serenity::Error> for GatewayError {
    fn from(err: serenity::Error) -> Self {
        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &err {
            match response.status_code.as_u16() {
                404 => return Self::NotFound(response.error.message.clone()),
                403 => return Self::Forbidden(response.error.message.clone()),
                _ => {}
            }
        }

        Self::Transient(err.to_string())
    }
}
