//! Error types for configuration handling.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid JSON or has unknown fields.
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A polling interval of zero seconds would spin the loop.
    #[error("{name} must be at least 1 second")]
    InvalidInterval { name: &'static str },

    /// Nothing would ever match.
    #[error("at least one script extension is required")]
    NoExtensions,

    /// The HTTP server needs a fixed port the consumer can reach.
    #[error("port must be non-zero")]
    InvalidPort,
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
