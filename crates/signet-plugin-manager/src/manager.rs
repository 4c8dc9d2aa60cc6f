//! Manager and resolver traits.

use std::sync::Arc;

use async_trait::async_trait;
use signet_plugin::{Context, Plugin};

use crate::PluginManagerResult;

/// Shared handle to a resolved plugin.
pub type PluginHandle = Arc<dyn Plugin>;

/// Resolves plugin names to plugins and enumerates what it can resolve.
#[async_trait]
pub trait PluginManager: Send + Sync {
    /// Returns the plugin registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginManagerError::PluginNotFound`](crate::PluginManagerError::PluginNotFound)
    /// if no plugin answers to `name`, or the error raised while loading it.
    async fn get(&self, ctx: &Context, name: &str) -> PluginManagerResult<PluginHandle>;

    /// Returns the names of every available plugin.
    ///
    /// # Errors
    ///
    /// Returns an error if a plugin source cannot be enumerated.
    async fn list(&self, ctx: &Context) -> PluginManagerResult<Vec<String>>;
}

/// One link in a resolution chain.
///
/// A resolver that does not know a name answers `Ok(None)` and the chain
/// moves on. An error ends resolution and is returned to the caller as is.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Looks up `name` in this source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source knows the name but cannot load it.
    async fn resolve(&self, ctx: &Context, name: &str)
    -> PluginManagerResult<Option<PluginHandle>>;

    /// Returns the names this source can resolve, in source order.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be enumerated.
    async fn list_names(&self, ctx: &Context) -> PluginManagerResult<Vec<String>>;
}
