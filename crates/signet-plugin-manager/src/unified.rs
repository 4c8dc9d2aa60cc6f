//! The manager the host talks to.
//!
//! In-process plugins are consulted first, then the plugin root on disk.
//! An in-process plugin therefore shadows an installed executable of the
//! same name.

use std::sync::Arc;

use async_trait::async_trait;
use signet_plugin::Context;
use tracing::debug;

use crate::manager::{PluginHandle, PluginManager, Resolver};
use crate::registry::PluginRegistry;
use crate::source::FsPluginSource;
use crate::{PluginManagerError, PluginManagerResult};

/// Resolves names through an ordered chain of resolvers.
#[derive(Clone)]
pub struct UnifiedManager {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl std::fmt::Debug for UnifiedManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiedManager")
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

impl UnifiedManager {
    /// Registers the in-process `plugins` and chains `fs` behind them.
    ///
    /// Without `fs`, only in-process plugins can be resolved.
    ///
    /// # Errors
    ///
    /// Returns [`PluginManagerError::InitFailed`] if any in-process plugin
    /// fails its metadata probe. No manager is built in that case.
    pub async fn new(
        ctx: &Context,
        plugins: Vec<PluginHandle>,
        fs: Option<FsPluginSource>,
    ) -> PluginManagerResult<Self> {
        let registry = PluginRegistry::load(ctx, plugins).await?;
        debug!(
            in_process = registry.len(),
            fs = fs.is_some(),
            "built plugin manager"
        );

        let mut resolvers: Vec<Arc<dyn Resolver>> = vec![Arc::new(registry)];
        if let Some(fs) = fs {
            resolvers.push(Arc::new(fs));
        }
        Ok(Self::from_resolvers(resolvers))
    }

    /// Builds a manager over an explicit chain, consulted in order.
    pub fn from_resolvers(resolvers: Vec<Arc<dyn Resolver>>) -> Self {
        Self { resolvers }
    }
}

#[async_trait]
impl PluginManager for UnifiedManager {
    async fn get(&self, ctx: &Context, name: &str) -> PluginManagerResult<PluginHandle> {
        for resolver in &self.resolvers {
            if let Some(plugin) = resolver.resolve(ctx, name).await? {
                return Ok(plugin);
            }
        }
        Err(PluginManagerError::PluginNotFound {
            name: name.to_string(),
        })
    }

    /// Concatenates every resolver's names in chain order. A name known to
    /// more than one resolver appears once per resolver.
    async fn list(&self, ctx: &Context) -> PluginManagerResult<Vec<String>> {
        let mut names = Vec::new();
        for resolver in &self.resolvers {
            names.extend(resolver.list_names(ctx).await?);
        }
        Ok(names)
    }
}
