//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A relative path tried to leave its sandbox root.
    #[error("path escapes {root}: {path}")]
    PathEscape { root: PathBuf, path: PathBuf },

    /// The user configuration directory could not be determined.
    #[error("could not determine the user configuration directory")]
    NoConfigDir,

    /// Invalid JSON in the settings file.
    #[error("invalid JSON in {path}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
