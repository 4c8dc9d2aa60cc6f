//! On-disk plugin layout.
//!
//! Every installed plugin lives in its own directory under the plugin root,
//! and the executable inside it carries the directory's name:
//! ```text
//! <plugin-root>/
//! ├── acme-kms/
//! │   └── acme-kms        (acme-kms.exe on Windows)
//! └── hsm/
//!     └── hsm
//! ```
//! Symbolic links are never followed, neither for plugin directories nor
//! for the executable itself.

use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use signet_config::SysFs;
use tracing::{debug, warn};

use crate::{PluginManagerError, PluginManagerResult};

/// Returns the executable file name for a plugin called `name` on this
/// platform.
#[must_use]
pub fn binary_name(name: &str) -> String {
    format!("{name}{}", std::env::consts::EXE_SUFFIX)
}

/// Read-only view of a plugin root directory.
#[derive(Debug, Clone)]
pub struct PluginStorage {
    fs: SysFs,
}

impl PluginStorage {
    /// Creates a storage view over `fs`.
    pub fn new(fs: SysFs) -> Self {
        Self { fs }
    }

    /// Creates a storage view over the user's plugin directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the user configuration directory is unknown.
    pub fn user() -> PluginManagerResult<Self> {
        let fs = signet_config::plugin_fs().map_err(PluginManagerError::InvalidPath)?;
        Ok(Self::new(fs))
    }

    /// Returns the plugin root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.fs.root()
    }

    /// Returns the expected executable path for `name` without checking it.
    ///
    /// # Errors
    ///
    /// Returns [`PluginManagerError::InvalidPluginName`] unless `name` is a
    /// single plain path component.
    pub fn plugin_path(&self, name: &str) -> PluginManagerResult<PathBuf> {
        let mut components = Path::new(name).components();
        let single = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(part)), None) if part == name
        );
        if !single {
            return Err(PluginManagerError::InvalidPluginName {
                name: name.to_string(),
            });
        }

        self.fs
            .sys_path(Path::new(name).join(binary_name(name)))
            .map_err(PluginManagerError::InvalidPath)
    }

    /// Returns the executable path for `name` after checking that it is
    /// installed.
    ///
    /// # Errors
    ///
    /// Returns [`PluginManagerError::PluginNotFound`] if the plugin directory
    /// or executable is missing, or the directory is a symbolic link, and
    /// [`PluginManagerError::NotRegularFile`] if the executable is not an
    /// executable regular file.
    pub fn locate(&self, name: &str) -> PluginManagerResult<PathBuf> {
        let path = self.plugin_path(name)?;
        let not_found = || PluginManagerError::PluginNotFound {
            name: name.to_string(),
        };

        let dir = self.fs.root().join(name);
        let Some(dir_meta) = lstat(&dir)? else {
            debug!(?dir, "plugin directory missing");
            return Err(not_found());
        };
        if dir_meta.file_type().is_symlink() {
            warn!(?dir, "ignoring symlinked plugin directory");
            return Err(not_found());
        }
        if !dir_meta.is_dir() {
            return Err(not_found());
        }

        let Some(meta) = lstat(&path)? else {
            debug!(?path, "plugin executable missing");
            return Err(not_found());
        };
        if !meta.file_type().is_file() || !is_executable(&meta) {
            return Err(PluginManagerError::NotRegularFile { path });
        }

        Ok(path)
    }

    /// Returns the name of every plugin directory directly under the root.
    ///
    /// Only real directories count: files and symbolic links are skipped,
    /// and nothing below the first level is visited. Whether a directory
    /// holds a usable executable is not checked. Names come back in the
    /// order the filesystem enumerates them.
    ///
    /// A missing root is the one IO failure that is not propagated: it
    /// means nothing is installed yet and yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the root exists but cannot be read, or one of
    /// its entries cannot be read.
    pub fn list(&self) -> PluginManagerResult<Vec<String>> {
        let root = self.fs.root();
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(?root, "plugin root missing");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            // DirEntry::file_type does not follow symlinks.
            let file_type = entry.file_type()?;
            if !file_type.is_dir() || file_type.is_symlink() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!(?raw, "skipping plugin directory with non UTF-8 name"),
            }
        }

        debug!(?root, count = names.len(), "listed plugin directories");
        Ok(names)
    }
}

fn lstat(path: &Path) -> PluginManagerResult<Option<Metadata>> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn is_executable(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &Metadata) -> bool {
    true
}
