//! No-op verifier plugin.
//!
//! Declares both verification capabilities but checks nothing: every
//! verification comes back with no results and no processed attributes,
//! which leaves the decision to the host. It holds no keys and cannot sign.

use async_trait::async_trait;
use signet_plugin::proto::{
    CONTRACT_VERSION, DescribeKeyRequest, DescribeKeyResponse, ErrorCode,
    GenerateEnvelopeRequest, GenerateEnvelopeResponse, GenerateSignatureRequest,
    GenerateSignatureResponse, GetMetadataRequest, VerifySignatureRequest,
    VerifySignatureResponse,
};
use signet_plugin::{Capability, Context, Plugin, PluginError, PluginMetadata, PluginResult};

/// Name the plugin registers under.
pub const NAME: &str = "noop";

/// No-op verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPlugin;

impl NoopPlugin {
    /// Creates a new no-op plugin.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Plugin for NoopPlugin {
    async fn get_metadata(
        &self,
        _ctx: &Context,
        _req: &GetMetadataRequest,
    ) -> PluginResult<PluginMetadata> {
        Ok(PluginMetadata {
            name: NAME.to_string(),
            description: "Accepts verification requests without checking anything".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            url: env!("CARGO_PKG_REPOSITORY").to_string(),
            supported_contract_versions: vec![CONTRACT_VERSION.to_string()],
            capabilities: vec![
                Capability::TrustedIdentityVerifier,
                Capability::RevocationCheckVerifier,
            ],
        })
    }

    async fn describe_key(
        &self,
        _ctx: &Context,
        req: &DescribeKeyRequest,
    ) -> PluginResult<DescribeKeyResponse> {
        Err(PluginError::Plugin {
            code: ErrorCode::ValidationError,
            message: format!("no key `{}` in the noop plugin", req.key_id),
        })
    }

    async fn generate_signature(
        &self,
        _ctx: &Context,
        _req: &GenerateSignatureRequest,
    ) -> PluginResult<GenerateSignatureResponse> {
        Err(PluginError::UnsupportedCapability {
            capability: Capability::SignatureGenerator,
        })
    }

    async fn generate_envelope(
        &self,
        _ctx: &Context,
        _req: &GenerateEnvelopeRequest,
    ) -> PluginResult<GenerateEnvelopeResponse> {
        Err(PluginError::UnsupportedCapability {
            capability: Capability::EnvelopeGenerator,
        })
    }

    async fn verify_signature(
        &self,
        _ctx: &Context,
        _req: &VerifySignatureRequest,
    ) -> PluginResult<VerifySignatureResponse> {
        Ok(VerifySignatureResponse::default())
    }
}
