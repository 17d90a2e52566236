use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// Failure to convert Unix timestamp to Discord timestamp
    ///
    /// Occurs when a valid Unix timestamp cannot be converted to Discord's
    /// timestamp format, typically due to timestamp being out of range.
    #[error("Failed to convert Unix timestamp {timestamp} to Discord timestamp: {reason}")]
    InvalidDiscordTimestamp {
        /// The Unix timestamp that failed to convert
        timestamp: i64,
        /// The reason for conversion failure
        reason: String,
    },

    /// A resolver task terminated without producing a result (panic or abort).
    #[error("Resolver task for {unit} did not complete: {reason}")]
    ResolverTaskFailed {
        /// Display form of the unit key
        unit: String,
        /// The join error reported by the runtime
        reason: String,
    },
}
