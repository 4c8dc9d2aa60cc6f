//! Plugin self-description.

use serde::{Deserialize, Serialize};

use super::{CONTRACT_VERSION, Capability, PluginConfig};

/// Request for [`PluginMetadata`]. Carries nothing a plugin must act on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMetadataRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_config: Option<PluginConfig>,
}

/// What a plugin declares about itself.
///
/// `name` is authoritative: it keys the in-process registry and must equal
/// the installation directory name of an executable plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub url: String,
    #[serde(default)]
    pub supported_contract_versions: Vec<String>,
    pub capabilities: Vec<Capability>,
}

/// Response to a get-plugin-metadata call.
pub type GetMetadataResponse = PluginMetadata;

impl PluginMetadata {
    /// Returns true if the plugin declares `capability`.
    #[must_use]
    pub fn has_capability(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Returns true if the plugin speaks the host's contract version.
    #[must_use]
    pub fn supports_contract(&self) -> bool {
        self.supported_contract_versions
            .iter()
            .any(|v| v == CONTRACT_VERSION)
    }
}
