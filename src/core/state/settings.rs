use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::installation::InstallationType;

/// User preferences persisted next to the mod cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LauncherSettings {
    pub installation_type: InstallationType,
    /// Fetch the `_dbg` plugin builds, which write logs.
    pub enable_plugin_logging: bool,
    /// Re-download the plugin files before every modded launch.
    pub enable_plugin_automatic_updates: bool,
}

impl LauncherSettings {
    pub fn with_installation_type(installation_type: InstallationType) -> Self {
        Self {
            installation_type,
            enable_plugin_logging: false,
            enable_plugin_automatic_updates: true,
        }
    }
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self::with_installation_type(InstallationType::NotSet)
    }
}

/// JSON file holding a `LauncherSettings`.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `defaults` when the file is missing, unreadable or malformed.
    pub fn load_or(&self, defaults: LauncherSettings) -> LauncherSettings {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return defaults,
            Err(e) => {
                warn!("Cannot read settings {:?}: {}. Loading defaults.", self.path, e);
                return defaults;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "Settings {:?} malformed or from an unsupported version. Loading defaults. Cause: {}",
                    self.path, e
                );
                defaults
            }
        }
    }

    pub fn save(&self, settings: &LauncherSettings) -> LauncherResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json).map_err(|e| LauncherError::io(&self.path, e))
    }
}
