//! Executor used for plugins installed on disk.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use signet_plugin::proto::Command;
use signet_plugin::{Context, PluginError, PluginResult};
use signet_plugin_manager::Executor;

/// Refuses every invocation. This build ships no plugin transport, so
/// executables can be listed but not run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedExecutor;

#[async_trait]
impl Executor for DetachedExecutor {
    async fn execute(
        &self,
        _ctx: &Context,
        path: &Path,
        command: Command,
        _request: Value,
    ) -> PluginResult<Value> {
        tracing::debug!(?path, %command, "refusing plugin invocation");
        Err(PluginError::Invocation(format!(
            "cannot run {command} on {}: no plugin transport available",
            path.display()
        )))
    }
}
