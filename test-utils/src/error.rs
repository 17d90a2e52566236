use thiserror::Error;

/// Errors that can occur while setting up a test context.
#[derive(Error, Debug)]
pub enum TestError {
    /// Creating the temporary directory or writing a seed file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A seed record could not be encoded, or a store file could not be decoded.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A seed record is missing the `guild_id` or `id` needed to place it in a file.
    #[error("Seed record is missing a string `{0}` field")]
    MalformedRecord(&'static str),
}
