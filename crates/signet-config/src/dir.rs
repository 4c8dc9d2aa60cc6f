//! Sandboxed directories and well-known locations.
//!
//! ```text
//! <user-config>/signet/
//! ├── config.json
//! └── plugins/
//!     ├── acme-kms/
//!     │   └── acme-kms
//!     └── ...
//! ```

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::{ConfigError, ConfigResult};

/// Application directory name under the user configuration directory.
pub const APP_DIR_NAME: &str = "signet";

/// Settings file name, relative to the configuration root.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Plugin root, relative to the configuration root.
pub const PLUGINS_DIR_NAME: &str = "plugins";

/// A directory that relative paths cannot escape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysFs {
    root: PathBuf,
}

impl SysFs {
    /// Creates a sandbox rooted at `root`. The directory need not exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the sandbox root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `rel` to a path on the system inside the root.
    ///
    /// Only plain components are accepted. `.` is ignored; `..`, absolute
    /// paths, and drive prefixes are rejected without touching the disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PathEscape`] for any component that could leave
    /// the root.
    pub fn sys_path(&self, rel: impl AsRef<Path>) -> ConfigResult<PathBuf> {
        let rel = rel.as_ref();
        let mut resolved = self.root.clone();

        for component in rel.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ConfigError::PathEscape {
                        root: self.root.clone(),
                        path: rel.to_path_buf(),
                    });
                }
            }
        }

        debug!(path = %resolved.display(), "resolved sandboxed path");
        Ok(resolved)
    }

    /// Returns a sandbox for a subdirectory of this one.
    ///
    /// # Errors
    ///
    /// Returns an error if `rel` escapes the root.
    pub fn sub(&self, rel: impl AsRef<Path>) -> ConfigResult<Self> {
        self.sys_path(rel).map(Self::new)
    }
}

/// Returns the configuration sandbox (`<user-config>/signet`).
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if the platform has no user
/// configuration directory.
pub fn config_fs() -> ConfigResult<SysFs> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(SysFs::new(base.join(APP_DIR_NAME)))
}

/// Returns the plugin root sandbox (`<user-config>/signet/plugins`).
///
/// # Errors
///
/// Returns an error if the configuration directory cannot be determined.
pub fn plugin_fs() -> ConfigResult<SysFs> {
    config_fs()?.sub(PLUGINS_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sys_path_joins_under_root() {
        let fs = SysFs::new("/opt/signet/plugins");
        let path = fs.sys_path("acme/acme").unwrap();
        assert_eq!(path, PathBuf::from("/opt/signet/plugins/acme/acme"));
    }

    #[test]
    fn test_sys_path_ignores_cur_dir() {
        let fs = SysFs::new("/opt/signet");
        assert_eq!(
            fs.sys_path("./config.json").unwrap(),
            PathBuf::from("/opt/signet/config.json")
        );
    }

    #[test]
    fn test_sys_path_rejects_parent_dir() {
        let fs = SysFs::new("/opt/signet/plugins");
        let result = fs.sys_path("../config.json");
        assert!(matches!(result, Err(ConfigError::PathEscape { .. })));
    }

    #[test]
    fn test_sys_path_rejects_nested_parent_dir() {
        let fs = SysFs::new("/opt/signet/plugins");
        assert!(fs.sys_path("acme/../../etc/passwd").is_err());
    }

    #[test]
    fn test_sys_path_rejects_absolute() {
        let fs = SysFs::new("/opt/signet/plugins");
        assert!(fs.sys_path("/usr/bin/env").is_err());
    }

    #[test]
    fn test_sub_sandbox() {
        let fs = SysFs::new("/opt/signet");
        let plugins = fs.sub(PLUGINS_DIR_NAME).unwrap();
        assert_eq!(plugins.root(), Path::new("/opt/signet/plugins"));
        assert!(plugins.sys_path("..").is_err());
    }

    #[test]
    fn test_plugin_fs_under_config_fs() {
        if let (Ok(config), Ok(plugins)) = (config_fs(), plugin_fs()) {
            assert!(plugins.root().starts_with(config.root()));
            assert!(plugins.root().ends_with("signet/plugins"));
        }
    }
}
