//! Capability protocol for Signet plugins.
//!
//! This crate provides the contract every signing plugin satisfies:
//! - [`proto`]: request/response schema for the five operations
//! - [`Plugin`]: the trait in-process and executable plugins implement
//! - [`Context`]: cancellation and timeout scope forwarded to each call
//! - [`compliance`]: structural checks that separate broken plugins from
//!   plugins reporting a failure

pub mod compliance;
mod context;
mod error;
mod plugin;
pub mod proto;

pub use context::Context;
pub use error::{PluginError, PluginResult};
pub use plugin::Plugin;
pub use proto::{Capability, PluginMetadata};
