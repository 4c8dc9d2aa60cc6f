//! Error types for the plugin manager.

use std::path::PathBuf;

use signet_plugin::PluginError;

/// Result type for plugin manager operations.
pub type PluginManagerResult<T> = Result<T, PluginManagerError>;

/// Plugin manager error types.
#[derive(Debug, thiserror::Error)]
pub enum PluginManagerError {
    /// No source knows a plugin by this name.
    #[error("plugin not found: {name}")]
    PluginNotFound { name: String },

    /// The installation path exists but is not an executable regular file.
    #[error("plugin executable is not a regular file: {path}")]
    NotRegularFile { path: PathBuf },

    /// The plugin answered its probe with a non-compliant response.
    #[error("plugin {name} is not compliant: {reason}")]
    NotCompliant { name: String, reason: String },

    /// An in-process plugin failed its metadata probe during construction.
    #[error("failed to initialize in-process plugin #{index}")]
    InitFailed {
        index: usize,
        #[source]
        source: PluginError,
    },

    /// Plugin name cannot be used as an installation directory.
    #[error("invalid plugin name: {name:?}")]
    InvalidPluginName { name: String },

    /// Plugin path could not be resolved inside the plugin root.
    #[error("invalid plugin path")]
    InvalidPath(#[source] signet_config::ConfigError),

    /// The plugin failed while being probed.
    #[error("plugin {name} failed")]
    Plugin {
        name: String,
        #[source]
        source: PluginError,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginManagerError {
    /// Wraps an error raised by the plugin named `name`.
    pub fn from_plugin(name: impl Into<String>, source: PluginError) -> Self {
        match source {
            PluginError::NotCompliant { reason } => Self::NotCompliant {
                name: name.into(),
                reason,
            },
            source => Self::Plugin {
                name: name.into(),
                source,
            },
        }
    }

    /// Returns true if the requested plugin does not exist in any source.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PluginNotFound { .. })
    }

    /// Returns true if the plugin violated the protocol.
    #[must_use]
    pub fn is_not_compliant(&self) -> bool {
        match self {
            Self::NotCompliant { .. } => true,
            Self::InitFailed { source, .. } | Self::Plugin { source, .. } => {
                source.is_not_compliant()
            }
            _ => false,
        }
    }
}
