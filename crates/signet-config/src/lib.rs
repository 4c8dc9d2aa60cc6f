//! Configuration management for Signet.
//!
//! This crate handles the sandboxed configuration and plugin directories and
//! the `config.json` settings file.

pub mod dir;
mod error;
mod loader;
mod schema;

pub use dir::{SysFs, config_fs, plugin_fs};
pub use error::{ConfigError, ConfigResult};
pub use loader::SettingsStore;
pub use schema::Settings;
