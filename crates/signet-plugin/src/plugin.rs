//! The plugin trait.

use async_trait::async_trait;

use crate::proto::{
    DescribeKeyRequest, DescribeKeyResponse, GenerateEnvelopeRequest, GenerateEnvelopeResponse,
    GenerateSignatureRequest, GenerateSignatureResponse, GetMetadataRequest, PluginMetadata,
    VerifySignatureRequest, VerifySignatureResponse,
};
use crate::{Context, PluginResult};

/// A resolved implementation of the capability protocol.
///
/// Both in-process plugins and executables installed on disk are used
/// through this trait. Implementations keep no per-call state, so a single
/// handle may serve concurrent callers.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Returns the plugin's self-description.
    ///
    /// # Errors
    ///
    /// Returns an error if the plugin cannot be reached or answers with an
    /// invalid description.
    async fn get_metadata(
        &self,
        ctx: &Context,
        req: &GetMetadataRequest,
    ) -> PluginResult<PluginMetadata>;

    /// Describes the key identified by `req.key_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the plugin fails or its response is not compliant.
    async fn describe_key(
        &self,
        ctx: &Context,
        req: &DescribeKeyRequest,
    ) -> PluginResult<DescribeKeyResponse>;

    /// Signs `req.payload` and returns the raw signature with its chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the plugin fails or its response is not compliant.
    async fn generate_signature(
        &self,
        ctx: &Context,
        req: &GenerateSignatureRequest,
    ) -> PluginResult<GenerateSignatureResponse>;

    /// Produces a complete signature envelope over `req.payload`.
    ///
    /// # Errors
    ///
    /// Returns an error if the plugin fails or its response is not compliant.
    async fn generate_envelope(
        &self,
        ctx: &Context,
        req: &GenerateEnvelopeRequest,
    ) -> PluginResult<GenerateEnvelopeResponse>;

    /// Runs the verification capabilities requested by the trust policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the plugin fails or its response is not compliant.
    /// A rejected signature is reported in the response, not as an error.
    async fn verify_signature(
        &self,
        ctx: &Context,
        req: &VerifySignatureRequest,
    ) -> PluginResult<VerifySignatureResponse>;
}
