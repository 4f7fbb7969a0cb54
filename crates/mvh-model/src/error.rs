use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a [`crate::SourceConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown source key '{key}' (expected one of: {expected})")]
    UnknownSource { key: String, expected: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
