//! Key description and raw signature generation.

use serde::{Deserialize, Serialize};

use super::{CONTRACT_VERSION, PluginConfig, bytes};

/// Key type and size of a signing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeySpec {
    #[serde(rename = "RSA-2048")]
    Rsa2048,
    #[serde(rename = "RSA-3072")]
    Rsa3072,
    #[serde(rename = "RSA-4096")]
    Rsa4096,
    #[serde(rename = "EC-256")]
    Ec256,
    #[serde(rename = "EC-384")]
    Ec384,
    #[serde(rename = "EC-521")]
    Ec521,
}

impl KeySpec {
    /// Returns the hash algorithm paired with this key spec.
    #[must_use]
    pub const fn hash_algorithm(self) -> HashAlgorithm {
        match self {
            Self::Rsa2048 | Self::Ec256 => HashAlgorithm::Sha256,
            Self::Rsa3072 | Self::Ec384 => HashAlgorithm::Sha384,
            Self::Rsa4096 | Self::Ec521 => HashAlgorithm::Sha512,
        }
    }

    /// Returns the signing algorithm a plugin must report for this key spec.
    #[must_use]
    pub const fn signature_algorithm(self) -> SignatureAlgorithm {
        match self {
            Self::Rsa2048 => SignatureAlgorithm::RsassaPssSha256,
            Self::Rsa3072 => SignatureAlgorithm::RsassaPssSha384,
            Self::Rsa4096 => SignatureAlgorithm::RsassaPssSha512,
            Self::Ec256 => SignatureAlgorithm::EcdsaSha256,
            Self::Ec384 => SignatureAlgorithm::EcdsaSha384,
            Self::Ec521 => SignatureAlgorithm::EcdsaSha512,
        }
    }
}

/// Digest algorithm applied to the payload before signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
}

/// Signing algorithm reported alongside a raw signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    #[serde(rename = "RSASSA-PSS-SHA-256")]
    RsassaPssSha256,
    #[serde(rename = "RSASSA-PSS-SHA-384")]
    RsassaPssSha384,
    #[serde(rename = "RSASSA-PSS-SHA-512")]
    RsassaPssSha512,
    #[serde(rename = "ECDSA-SHA-256")]
    EcdsaSha256,
    #[serde(rename = "ECDSA-SHA-384")]
    EcdsaSha384,
    #[serde(rename = "ECDSA-SHA-512")]
    EcdsaSha512,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeKeyRequest {
    pub contract_version: String,
    pub key_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_config: Option<PluginConfig>,
}

impl DescribeKeyRequest {
    #[must_use]
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            contract_version: CONTRACT_VERSION.to_string(),
            key_id: key_id.into(),
            plugin_config: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeKeyResponse {
    pub key_id: String,
    pub key_spec: KeySpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSignatureRequest {
    pub contract_version: String,
    pub key_id: String,
    pub key_spec: KeySpec,
    pub hash_algorithm: HashAlgorithm,
    #[serde(with = "bytes")]
    pub payload: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_config: Option<PluginConfig>,
}

impl GenerateSignatureRequest {
    /// Builds a request for `key_id`, deriving the hash algorithm from `key_spec`.
    #[must_use]
    pub fn new(key_id: impl Into<String>, key_spec: KeySpec, payload: Vec<u8>) -> Self {
        Self {
            contract_version: CONTRACT_VERSION.to_string(),
            key_id: key_id.into(),
            key_spec,
            hash_algorithm: key_spec.hash_algorithm(),
            payload,
            plugin_config: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSignatureResponse {
    pub key_id: String,
    #[serde(with = "bytes")]
    pub signature: Vec<u8>,
    pub signing_algorithm: SignatureAlgorithm,
    #[serde(with = "bytes::list")]
    pub certificate_chain: Vec<Vec<u8>>,
}
