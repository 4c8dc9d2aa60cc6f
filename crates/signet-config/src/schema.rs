//! Settings schema.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Registries reached over plain HTTP or with unverified TLS.
    #[serde(
        default,
        rename = "insecureRegistries",
        deserialize_with = "null_as_empty"
    )]
    pub insecure_registries: Vec<String>,

    /// Default credential store.
    #[serde(
        default,
        rename = "credsStore",
        skip_serializing_if = "Option::is_none"
    )]
    pub credentials_store: Option<String>,

    /// Per-registry credential helpers.
    #[serde(
        default,
        rename = "credHelpers",
        skip_serializing_if = "Option::is_none"
    )]
    pub credential_helpers: Option<HashMap<String, String>>,

    /// Envelope format used when signing.
    #[serde(
        default,
        rename = "signatureFormat",
        skip_serializing_if = "Option::is_none"
    )]
    pub signature_format: Option<String>,
}

impl Settings {
    /// Returns true if `registry` is listed as insecure, ignoring case.
    ///
    /// Comparison lowercases both sides with Unicode rules, so
    /// internationalized host names match regardless of case too.
    #[must_use]
    pub fn is_registry_insecure(&self, registry: &str) -> bool {
        let registry = registry.to_lowercase();
        self.insecure_registries
            .iter()
            .any(|r| r.to_lowercase() == registry)
    }

    /// Returns the credential helper configured for `registry`, if any.
    #[must_use]
    pub fn credential_helper(&self, registry: &str) -> Option<&str> {
        self.credential_helpers
            .as_ref()
            .and_then(|helpers| helpers.get(registry))
            .map(String::as_str)
    }
}

/// Reads an explicit `null` list as empty. Older writers emit `null` for
/// an unset list instead of omitting the key.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
