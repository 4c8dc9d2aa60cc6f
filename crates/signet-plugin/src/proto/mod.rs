//! Capability protocol schema.
//!
//! Every plugin, in-process or installed on disk, speaks the same five
//! request/response pairs. Field names follow the JSON schema plugins
//! exchange with the host (`camelCase`, base64 for binary fields).

mod bytes;
mod envelope;
mod key;
mod metadata;
mod verify;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use envelope::{GenerateEnvelopeRequest, GenerateEnvelopeResponse};
pub use key::{
    DescribeKeyRequest, DescribeKeyResponse, GenerateSignatureRequest, GenerateSignatureResponse,
    HashAlgorithm, KeySpec, SignatureAlgorithm,
};
pub use metadata::{GetMetadataRequest, GetMetadataResponse, PluginMetadata};
pub use verify::{
    CriticalAttributes, Signature, TrustPolicy, VerificationResult, VerifySignatureRequest,
    VerifySignatureResponse,
};

/// Protocol contract version spoken by this host.
pub const CONTRACT_VERSION: &str = "1.0";

/// Free-form key/value configuration forwarded to a plugin.
pub type PluginConfig = HashMap<String, String>;

/// An operation category a plugin declares support for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Capability {
    /// Produces raw signatures over a payload.
    SignatureGenerator,
    /// Produces complete signature envelopes.
    EnvelopeGenerator,
    /// Verifies the signing identity against a trust policy.
    TrustedIdentityVerifier,
    /// Checks the signing certificate chain for revocation.
    RevocationCheckVerifier,
    /// A capability this host does not know about.
    Other(String),
}

impl Capability {
    /// Returns the wire tag for this capability.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SignatureGenerator => "SIGNATURE_GENERATOR.RAW",
            Self::EnvelopeGenerator => "SIGNATURE_GENERATOR.ENVELOPE",
            Self::TrustedIdentityVerifier => "SIGNATURE_VERIFIER.TRUSTED_IDENTITY",
            Self::RevocationCheckVerifier => "SIGNATURE_VERIFIER.REVOCATION_CHECK",
            Self::Other(tag) => tag,
        }
    }

    /// Returns true for the verification capabilities.
    #[must_use]
    pub fn is_verifier(&self) -> bool {
        matches!(
            self,
            Self::TrustedIdentityVerifier | Self::RevocationCheckVerifier
        ) || self.as_str().starts_with("SIGNATURE_VERIFIER.")
    }
}

impl From<String> for Capability {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "SIGNATURE_GENERATOR.RAW" => Self::SignatureGenerator,
            "SIGNATURE_GENERATOR.ENVELOPE" => Self::EnvelopeGenerator,
            "SIGNATURE_VERIFIER.TRUSTED_IDENTITY" => Self::TrustedIdentityVerifier,
            "SIGNATURE_VERIFIER.REVOCATION_CHECK" => Self::RevocationCheckVerifier,
            _ => Self::Other(tag),
        }
    }
}

impl From<Capability> for String {
    fn from(capability: Capability) -> Self {
        match capability {
            Capability::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol command names, one per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    #[serde(rename = "get-plugin-metadata")]
    GetMetadata,
    DescribeKey,
    GenerateSignature,
    GenerateEnvelope,
    VerifySignature,
}

impl Command {
    /// Returns the command name as passed to an executable plugin.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetMetadata => "get-plugin-metadata",
            Self::DescribeKey => "describe-key",
            Self::GenerateSignature => "generate-signature",
            Self::GenerateEnvelope => "generate-envelope",
            Self::VerifySignature => "verify-signature",
        }
    }

    /// Returns the capability a plugin must declare to receive this command.
    #[must_use]
    pub fn required_capability(self) -> Option<Capability> {
        match self {
            Self::GenerateSignature => Some(Capability::SignatureGenerator),
            Self::GenerateEnvelope => Some(Capability::EnvelopeGenerator),
            Self::GetMetadata | Self::DescribeKey | Self::VerifySignature => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error classification reported by a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    UnsupportedContractVersion,
    AccessDenied,
    Timeout,
    Throttled,
    #[serde(rename = "ERROR")]
    Generic,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::UnsupportedContractVersion => "UNSUPPORTED_CONTRACT_VERSION",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::Timeout => "TIMEOUT",
            Self::Throttled => "THROTTLED",
            Self::Generic => "ERROR",
        };
        f.write_str(s)
    }
}

/// Error body a plugin returns instead of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_code: ErrorCode,
    #[serde(default)]
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<HashMap<String, String>>,
}
