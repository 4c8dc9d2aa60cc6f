//! Settings loading, caching, and persistence.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::dir::{CONFIG_FILE_NAME, SysFs, config_fs};
use crate::{ConfigError, ConfigResult, Settings};

/// Owns the settings file and its in-memory copy.
///
/// The file is read on first use and cached. [`SettingsStore::load`] rereads
/// it and replaces the cache wholesale; readers holding an earlier `Arc`
/// keep the value they were given.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    cached: RwLock<Option<Arc<Settings>>>,
}

impl SettingsStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: RwLock::new(None),
        }
    }

    /// Creates a store for `config.json` inside a configuration sandbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the file name cannot be resolved inside `fs`.
    pub fn in_dir(fs: &SysFs) -> ConfigResult<Self> {
        Ok(Self::new(fs.sys_path(CONFIG_FILE_NAME)?))
    }

    /// Creates a store for the user's `config.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration directory cannot be determined.
    pub fn user() -> ConfigResult<Self> {
        Self::in_dir(&config_fs()?)
    }

    /// Returns the settings file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached settings, loading them on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the first load fails.
    pub fn load_from_cache(&self) -> ConfigResult<Arc<Settings>> {
        if let Some(settings) = self
            .cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(settings));
        }

        let mut cached = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have loaded while we waited for the write lock.
        if let Some(settings) = cached.as_ref() {
            return Ok(Arc::clone(settings));
        }

        let settings = Arc::new(read_settings(&self.path)?);
        *cached = Some(Arc::clone(&settings));
        Ok(settings)
    }

    /// Rereads the settings file and replaces the cache.
    ///
    /// A missing file yields empty settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed. The
    /// cache is left untouched in that case.
    pub fn load(&self) -> ConfigResult<Arc<Settings>> {
        let settings = Arc::new(read_settings(&self.path)?);
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&settings));
        Ok(settings)
    }

    /// Writes the full document to disk and makes it the cached value.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be written.
    pub fn save(&self, settings: &Settings) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(settings).map_err(|source| {
            ConfigError::InvalidJson {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "saved settings");

        *self.cached.write().unwrap_or_else(PoisonError::into_inner) =
            Some(Arc::new(settings.clone()));
        Ok(())
    }
}

fn read_settings(path: &Path) -> ConfigResult<Settings> {
    debug!(?path, "loading settings");

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(?path, "no settings file, using defaults");
            return Ok(Settings::default());
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content).map_err(|source| ConfigError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, SettingsStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::in_dir(&SysFs::new(temp_dir.path())).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_store_path() {
        let (temp_dir, store) = create_test_store();
        assert_eq!(store.path(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_missing_file_yields_empty_settings() {
        let (_temp, store) = create_test_store();
        let settings = store.load_from_cache().unwrap();
        assert_eq!(*settings, Settings::default());
    }

    #[test]
    fn test_cached_read_does_not_touch_disk() {
        let (_temp, store) = create_test_store();
        let first = store.load_from_cache().unwrap();

        // A file appearing later is not seen through the cache.
        fs::write(store.path(), r#"{"insecureRegistries":["late.example.com"]}"#).unwrap();

        let second = store.load_from_cache().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!second.is_registry_insecure("late.example.com"));
    }

    #[test]
    fn test_load_replaces_cache() {
        let (_temp, store) = create_test_store();
        let before = store.load_from_cache().unwrap();

        fs::write(store.path(), r#"{"insecureRegistries":["late.example.com"]}"#).unwrap();
        let reloaded = store.load().unwrap();

        assert!(!Arc::ptr_eq(&before, &reloaded));
        assert!(reloaded.is_registry_insecure("late.example.com"));
        assert!(Arc::ptr_eq(&reloaded, &store.load_from_cache().unwrap()));
        // Earlier readers keep their snapshot.
        assert!(before.insecure_registries.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_temp, store) = create_test_store();
        let settings = Settings {
            insecure_registries: vec!["Reg.Example.com".to_string()],
            ..Settings::default()
        };
        store.save(&settings).unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.is_registry_insecure("reg.example.com"));
        assert!(!loaded.is_registry_insecure("other.com"));
    }

    #[test]
    fn test_save_overwrites_whole_document() {
        let (_temp, store) = create_test_store();
        fs::write(
            store.path(),
            r#"{"insecureRegistries":["a"],"credsStore":"pass"}"#,
        )
        .unwrap();

        store.save(&Settings::default()).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(!content.contains("credsStore"));
        assert!(store.load().unwrap().credentials_store.is_none());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::new(temp_dir.path().join("nested/config.json"));
        store.save(&Settings::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_updates_cache() {
        let (_temp, store) = create_test_store();
        store.load_from_cache().unwrap();

        let settings = Settings {
            signature_format: Some("cose".to_string()),
            ..Settings::default()
        };
        store.save(&settings).unwrap();

        assert_eq!(
            store.load_from_cache().unwrap().signature_format.as_deref(),
            Some("cose")
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), "{ not json").unwrap();

        let result = store.load_from_cache();
        assert!(matches!(result, Err(ConfigError::InvalidJson { .. })));
    }

    #[test]
    fn test_null_insecure_registries_file_loads() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), r#"{"insecureRegistries":null}"#).unwrap();

        let settings = store.load_from_cache().unwrap();
        assert!(settings.insecure_registries.is_empty());
    }

    #[test]
    fn test_user_store_is_config_json() {
        if let Ok(store) = SettingsStore::user() {
            assert!(store.path().ends_with("signet/config.json"));
        }
    }

    #[test]
    fn test_failed_reload_keeps_cache() {
        let (_temp, store) = create_test_store();
        let cached = store.load_from_cache().unwrap();

        fs::write(store.path(), "[1, 2").unwrap();
        assert!(store.load().is_err());
        assert!(Arc::ptr_eq(&cached, &store.load_from_cache().unwrap()));
    }
}
