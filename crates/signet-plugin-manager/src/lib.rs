//! Plugin manager for Signet.
//!
//! This crate handles:
//! - Registering in-process plugins under the name they report
//! - Locating executable plugins installed under the plugin root
//! - Probing and checking executable plugins before handing them out
//! - Resolving names across both sources, in-process first

pub mod error;
pub mod executable;
pub mod manager;
pub mod registry;
pub mod source;
pub mod storage;
pub mod unified;

pub use error::{PluginManagerError, PluginManagerResult};
pub use executable::{ExecutablePlugin, Executor};
pub use manager::{PluginHandle, PluginManager, Resolver};
pub use registry::PluginRegistry;
pub use source::FsPluginSource;
pub use storage::{PluginStorage, binary_name};
pub use unified::UnifiedManager;
