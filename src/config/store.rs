//! Thread-safe configuration storage.
//!
//! The controller reads settings through this store on every decision, so an
//! embedding application can reload or tweak them at runtime without
//! restarting the controller.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::loader::ConfigError;
use crate::config::types::FollowConfig;

/// Cheaply clonable config container with interior mutability.
///
/// Multiple readers can access the config concurrently while supporting
/// atomic updates when needed.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<RwLock<FollowConfig>>,
    path: PathBuf,
}

impl ConfigStore {
    /// Create a new ConfigStore from initial config and backing file path.
    pub fn new(config: FollowConfig, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path,
        }
    }

    /// Get a clone of the current config.
    ///
    /// This is cheap because FollowConfig is Clone.
    pub fn get(&self) -> FollowConfig {
        self.inner.read().clone()
    }

    /// Apply `change` to the current config atomically.
    pub fn update(&self, change: impl FnOnce(&mut FollowConfig)) {
        let mut guard = self.inner.write();
        change(&mut guard);
    }

    /// Reload config from the backing file.
    ///
    /// On success, atomically replaces the current config.
    /// On failure, keeps the old config and returns the error.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let config = FollowConfig::load_from(&self.path)?;
        let mut guard = self.inner.write();
        *guard = config;
        Ok(())
    }

    /// Get the backing config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigStore {
    /// Defaults plus the standard config path; what embedders want when no
    /// file has been loaded yet.
    fn default() -> Self {
        Self::new(FollowConfig::default(), FollowConfig::config_path())
    }
}
