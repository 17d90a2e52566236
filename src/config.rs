use std::path::PathBuf;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_DATA_DIR: &str = "data";

pub struct Config {
    pub discord_token: String,

    /// Directory holding one JSON file per timed-unit kind.
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            discord_token: std::env::var("DISCORD_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("DISCORD_TOKEN".to_string()))?,
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
        })
    }
}
