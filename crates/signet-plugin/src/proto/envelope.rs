//! Envelope generation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CONTRACT_VERSION, PluginConfig, bytes};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateEnvelopeRequest {
    pub contract_version: String,
    pub key_id: String,
    /// Media type of the payload being signed.
    pub payload_type: String,
    /// Media type of the envelope the plugin must produce.
    pub signature_envelope_type: String,
    #[serde(with = "bytes")]
    pub payload: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_config: Option<PluginConfig>,
}

impl GenerateEnvelopeRequest {
    #[must_use]
    pub fn new(
        key_id: impl Into<String>,
        payload_type: impl Into<String>,
        signature_envelope_type: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            contract_version: CONTRACT_VERSION.to_string(),
            key_id: key_id.into(),
            payload_type: payload_type.into(),
            signature_envelope_type: signature_envelope_type.into(),
            payload,
            plugin_config: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateEnvelopeResponse {
    #[serde(with = "bytes")]
    pub signature_envelope: Vec<u8>,
    pub signature_envelope_type: String,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}
