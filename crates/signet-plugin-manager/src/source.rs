//! Executable plugins discovered on disk.

use std::sync::Arc;

use async_trait::async_trait;
use signet_config::SysFs;
use signet_plugin::Context;
use tracing::debug;

use crate::executable::{ExecutablePlugin, Executor};
use crate::manager::{PluginHandle, PluginManager, Resolver};
use crate::storage::PluginStorage;
use crate::{PluginManagerError, PluginManagerResult};

/// Resolves plugins installed under a plugin root.
///
/// Every `get` checks the disk again and probes the executable, so a
/// plugin installed or removed while the host runs is picked up on the
/// next lookup.
#[derive(Clone)]
pub struct FsPluginSource {
    storage: PluginStorage,
    executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for FsPluginSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsPluginSource")
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl FsPluginSource {
    /// Creates a source over the plugin root `fs`.
    pub fn new(fs: SysFs, executor: Arc<dyn Executor>) -> Self {
        Self::with_storage(PluginStorage::new(fs), executor)
    }

    /// Creates a source over an existing storage view.
    pub fn with_storage(storage: PluginStorage, executor: Arc<dyn Executor>) -> Self {
        Self { storage, executor }
    }

    /// Returns the storage view this source reads.
    #[must_use]
    pub fn storage(&self) -> &PluginStorage {
        &self.storage
    }
}

#[async_trait]
impl PluginManager for FsPluginSource {
    async fn get(&self, ctx: &Context, name: &str) -> PluginManagerResult<PluginHandle> {
        let path = self.storage.locate(name)?;
        debug!(name, ?path, "probing executable plugin");

        let plugin = ExecutablePlugin::load(ctx, name, path, Arc::clone(&self.executor))
            .await
            .map_err(|e| PluginManagerError::from_plugin(name, e))?;
        Ok(Arc::new(plugin))
    }

    async fn list(&self, _ctx: &Context) -> PluginManagerResult<Vec<String>> {
        self.storage.list()
    }
}

#[async_trait]
impl Resolver for FsPluginSource {
    async fn resolve(
        &self,
        ctx: &Context,
        name: &str,
    ) -> PluginManagerResult<Option<PluginHandle>> {
        // Last link in the chain: a miss here is final, so it stays an error.
        self.get(ctx, name).await.map(Some)
    }

    async fn list_names(&self, ctx: &Context) -> PluginManagerResult<Vec<String>> {
        self.list(ctx).await
    }
}
