//! Plugins installed as executables.
//!
//! Launching a process and moving bytes over its stdio is the job of an
//! [`Executor`]. [`ExecutablePlugin`] sits on top of it and turns raw JSON
//! into typed, checked responses: anything that does not decode, or decodes
//! into something the protocol forbids, is reported as a compliance failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use signet_plugin::compliance;
use signet_plugin::proto::{
    Command, DescribeKeyRequest, DescribeKeyResponse, GenerateEnvelopeRequest,
    GenerateEnvelopeResponse, GenerateSignatureRequest, GenerateSignatureResponse,
    GetMetadataRequest, VerifySignatureRequest, VerifySignatureResponse,
};
use signet_plugin::{Context, Plugin, PluginError, PluginMetadata, PluginResult};
use tracing::debug;

/// Runs one command against a plugin executable.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Sends `request` to the executable at `path` as `command` and returns
    /// its response body.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Plugin`] when the executable answers with an
    /// error response, or another error if it cannot be run at all.
    async fn execute(
        &self,
        ctx: &Context,
        path: &Path,
        command: Command,
        request: Value,
    ) -> PluginResult<Value>;
}

/// A plugin backed by an installed executable.
pub struct ExecutablePlugin {
    name: String,
    path: PathBuf,
    metadata: PluginMetadata,
    executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for ExecutablePlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutablePlugin")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl ExecutablePlugin {
    /// Probes the executable at `path` and wraps it if it describes itself
    /// as `name`.
    ///
    /// # Errors
    ///
    /// Returns a compliance error if the metadata is malformed or names a
    /// different plugin, or the executor's error if the probe fails.
    pub async fn load(
        ctx: &Context,
        name: &str,
        path: PathBuf,
        executor: Arc<dyn Executor>,
    ) -> PluginResult<Self> {
        let metadata = probe(ctx, executor.as_ref(), name, &path, &GetMetadataRequest::default())
            .await?;
        debug!(name, ?path, version = %metadata.version, "loaded executable plugin");

        Ok(Self {
            name: name.to_string(),
            path,
            metadata,
            executor,
        })
    }

    /// Returns the name the plugin is installed under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the executable path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the metadata captured when the plugin was loaded.
    #[must_use]
    pub fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    async fn call<Req, Resp>(&self, ctx: &Context, command: Command, req: &Req) -> PluginResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned + Send,
    {
        compliance::require_capability(&self.metadata, command)?;
        invoke(ctx, self.executor.as_ref(), &self.path, command, req).await
    }
}

#[async_trait]
impl Plugin for ExecutablePlugin {
    async fn get_metadata(
        &self,
        ctx: &Context,
        req: &GetMetadataRequest,
    ) -> PluginResult<PluginMetadata> {
        probe(ctx, self.executor.as_ref(), &self.name, &self.path, req).await
    }

    async fn describe_key(
        &self,
        ctx: &Context,
        req: &DescribeKeyRequest,
    ) -> PluginResult<DescribeKeyResponse> {
        let resp = self.call(ctx, Command::DescribeKey, req).await?;
        compliance::validate_describe_key(req, &resp)?;
        Ok(resp)
    }

    async fn generate_signature(
        &self,
        ctx: &Context,
        req: &GenerateSignatureRequest,
    ) -> PluginResult<GenerateSignatureResponse> {
        let resp = self.call(ctx, Command::GenerateSignature, req).await?;
        compliance::validate_generate_signature(req, &resp)?;
        Ok(resp)
    }

    async fn generate_envelope(
        &self,
        ctx: &Context,
        req: &GenerateEnvelopeRequest,
    ) -> PluginResult<GenerateEnvelopeResponse> {
        let resp = self.call(ctx, Command::GenerateEnvelope, req).await?;
        compliance::validate_generate_envelope(req, &resp)?;
        Ok(resp)
    }

    async fn verify_signature(
        &self,
        ctx: &Context,
        req: &VerifySignatureRequest,
    ) -> PluginResult<VerifySignatureResponse> {
        let resp = self.call(ctx, Command::VerifySignature, req).await?;
        compliance::validate_verify_signature(req, &resp)?;
        Ok(resp)
    }
}

async fn probe(
    ctx: &Context,
    executor: &dyn Executor,
    name: &str,
    path: &Path,
    req: &GetMetadataRequest,
) -> PluginResult<PluginMetadata> {
    let metadata: PluginMetadata = invoke(ctx, executor, path, Command::GetMetadata, req).await?;
    compliance::validate_metadata(&metadata)?;
    compliance::validate_metadata_name(&metadata, name)?;
    Ok(metadata)
}

async fn invoke<Req, Resp>(
    ctx: &Context,
    executor: &dyn Executor,
    path: &Path,
    command: Command,
    req: &Req,
) -> PluginResult<Resp>
where
    Req: Serialize + Sync,
    Resp: DeserializeOwned + Send,
{
    let request = serde_json::to_value(req)
        .map_err(|e| PluginError::Invocation(format!("failed to encode {command} request: {e}")))?;
    let body = ctx.run(executor.execute(ctx, path, command, request)).await?;
    serde_json::from_value(body)
        .map_err(|e| PluginError::not_compliant(format!("malformed {command} response: {e}")))
}
