//! Registry of in-process plugins.

use std::collections::HashMap;

use async_trait::async_trait;
use signet_plugin::Context;
use signet_plugin::compliance;
use signet_plugin::proto::GetMetadataRequest;
use tracing::{debug, warn};

use crate::manager::{PluginHandle, Resolver};
use crate::{PluginManagerError, PluginManagerResult};

/// In-process plugins keyed by the name they report about themselves.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, PluginHandle>,
    order: Vec<String>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.order)
            .finish()
    }
}

impl PluginRegistry {
    /// Probes each plugin for its metadata and registers it under the
    /// declared name.
    ///
    /// When two plugins declare the same name, the later one replaces the
    /// earlier one and keeps the earlier one's position.
    ///
    /// # Errors
    ///
    /// Returns [`PluginManagerError::InitFailed`] for the first plugin whose
    /// probe fails or whose metadata is incomplete.
    pub async fn load(
        ctx: &Context,
        plugins: impl IntoIterator<Item = PluginHandle>,
    ) -> PluginManagerResult<Self> {
        let mut registry = Self::default();
        let req = GetMetadataRequest::default();

        for (index, plugin) in plugins.into_iter().enumerate() {
            let metadata = ctx
                .run(plugin.get_metadata(ctx, &req))
                .await
                .and_then(|metadata| compliance::validate_metadata(&metadata).map(|()| metadata))
                .map_err(|source| PluginManagerError::InitFailed { index, source })?;

            let name = metadata.name;
            if registry.plugins.insert(name.clone(), plugin).is_some() {
                warn!(%name, "in-process plugin registered twice, keeping the later one");
            } else {
                registry.order.push(name.clone());
            }
            debug!(%name, version = %metadata.version, "registered in-process plugin");
        }

        Ok(registry)
    }

    /// Returns the plugin registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PluginHandle> {
        self.plugins.get(name)
    }

    /// Returns registered names in registration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[async_trait]
impl Resolver for PluginRegistry {
    async fn resolve(
        &self,
        _ctx: &Context,
        name: &str,
    ) -> PluginManagerResult<Option<PluginHandle>> {
        Ok(self.get(name).cloned())
    }

    async fn list_names(&self, _ctx: &Context) -> PluginManagerResult<Vec<String>> {
        Ok(self.order.clone())
    }
}
