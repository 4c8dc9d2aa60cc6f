//! Signature verification.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CONTRACT_VERSION, Capability, PluginConfig, bytes};

/// Attributes a verifier must understand to accept a signature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalAttributes {
    pub content_type: String,
    pub signing_scheme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentic_signing_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extended_attributes: HashMap<String, Value>,
}

/// The signature under verification, as seen by a verifier plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub critical_attributes: CriticalAttributes,
    /// Extended attribute ids the host could not process itself.
    #[serde(default)]
    pub unprocessed_attributes: Vec<String>,
    #[serde(with = "bytes::list")]
    pub certificate_chain: Vec<Vec<u8>>,
}

/// Trust policy parameters relevant to the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustPolicy {
    #[serde(default)]
    pub trusted_identities: Vec<String>,
    /// Verification capabilities the host asks the plugin to exercise.
    #[serde(default)]
    pub signature_verification: Vec<Capability>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySignatureRequest {
    pub contract_version: String,
    pub signature: Signature,
    pub trust_policy: TrustPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_config: Option<PluginConfig>,
}

impl VerifySignatureRequest {
    #[must_use]
    pub fn new(signature: Signature, trust_policy: TrustPolicy) -> Self {
        Self {
            contract_version: CONTRACT_VERSION.to_string(),
            signature,
            trust_policy,
            plugin_config: None,
        }
    }
}

/// Outcome of one verification capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

impl VerificationResult {
    #[must_use]
    pub fn passed() -> Self {
        Self {
            success: true,
            reason: String::new(),
        }
    }

    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: reason.into(),
        }
    }
}

/// Verification outcome. Both collections may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySignatureResponse {
    pub verification_results: HashMap<Capability, VerificationResult>,
    pub processed_attributes: Vec<String>,
}
