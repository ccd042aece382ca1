//! Error type shared by the settle crates

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a debounced function or loading its config
#[derive(Debug, Error)]
pub enum SettleError {
    /// The tokio scheduler was requested outside of a tokio runtime
    #[error("no tokio runtime available: debounced functions must be created inside a runtime")]
    NoRuntime,

    /// Config file could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be parsed
    #[error("invalid debounce config: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for settle operations
pub type Result<T> = std::result::Result<T, SettleError>;
