//! Plugin error types.

use std::time::Duration;

use thiserror::Error;

use crate::proto::{Capability, ErrorCode, ErrorResponse};

/// Plugin-related errors.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin answered with something that violates the protocol.
    ///
    /// A plugin in this state is broken or hostile; callers must not retry
    /// or trust anything else it returns.
    #[error("plugin not compliant: {reason}")]
    NotCompliant { reason: String },

    /// The plugin reported a failure through the protocol.
    #[error("plugin error {code}: {message}")]
    Plugin { code: ErrorCode, message: String },

    /// The plugin was asked for a capability it does not declare.
    #[error("plugin does not declare capability {capability}")]
    UnsupportedCapability { capability: Capability },

    /// The caller cancelled the invocation.
    #[error("plugin invocation cancelled")]
    Cancelled,

    /// The invocation exceeded the caller's timeout.
    #[error("plugin invocation timed out after {0:?}")]
    TimedOut(Duration),

    /// The plugin could not be invoked at all.
    #[error("plugin invocation failed: {0}")]
    Invocation(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginError {
    /// Creates a compliance failure.
    pub fn not_compliant(reason: impl Into<String>) -> Self {
        Self::NotCompliant {
            reason: reason.into(),
        }
    }

    /// Returns true for compliance failures.
    #[must_use]
    pub fn is_not_compliant(&self) -> bool {
        matches!(self, Self::NotCompliant { .. })
    }
}

impl From<ErrorResponse> for PluginError {
    fn from(resp: ErrorResponse) -> Self {
        Self::Plugin {
            code: resp.error_code,
            message: resp.error_message,
        }
    }
}

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_compliant_display() {
        let err = PluginError::not_compliant("missing field `name`");
        insta::assert_snapshot!(err.to_string(), @"plugin not compliant: missing field `name`");
        assert!(err.is_not_compliant());
    }

    #[test]
    fn test_plugin_error_from_response() {
        let err: PluginError = ErrorResponse {
            error_code: ErrorCode::Throttled,
            error_message: "slow down".to_string(),
            error_details: None,
        }
        .into();
        insta::assert_snapshot!(err.to_string(), @"plugin error THROTTLED: slow down");
        assert!(!err.is_not_compliant());
    }

    #[test]
    fn test_unsupported_capability_display() {
        let err = PluginError::UnsupportedCapability {
            capability: Capability::EnvelopeGenerator,
        };
        assert_eq!(
            err.to_string(),
            "plugin does not declare capability SIGNATURE_GENERATOR.ENVELOPE"
        );
    }

    #[test]
    fn test_timed_out_display() {
        let err = PluginError::TimedOut(Duration::from_secs(3));
        assert_eq!(err.to_string(), "plugin invocation timed out after 3s");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: PluginError = io_err.into();
        assert!(matches!(err, PluginError::Io(_)));
    }
}
