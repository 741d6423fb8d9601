use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::installation::layout::{plugins_relative, INJECTOR_MODULE_NAME, MOD_CACHE_DIR};
use crate::core::installation::InstallationType;

const RELEASES_BASE_URL: &str = "https://github.com/Chiv2-Community";

/// Which build of the plugin binaries to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildFlavor {
    #[default]
    Release,
    /// `_dbg.dll` builds, which write plugin logs.
    Debug,
}

impl BuildFlavor {
    pub fn from_plugin_logging(enabled: bool) -> Self {
        if enabled {
            BuildFlavor::Debug
        } else {
            BuildFlavor::Release
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Helper module injected into the game at modded launch.
    Injector,
    /// Plugin loaded by the injector from the plugins directory.
    Plugin,
}

/// One remote file managed as part of the install/remove lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: String,
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_source_url: Option<String>,
    /// Relative to the game root.
    pub destination: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    pub kind: EntryKind,
    /// Empty means every installation type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub installation_types: Vec<InstallationType>,
}

impl ManifestEntry {
    pub fn url_for(&self, flavor: BuildFlavor) -> &str {
        match (flavor, &self.debug_source_url) {
            (BuildFlavor::Debug, Some(url)) => url,
            _ => &self.source_url,
        }
    }

    pub fn applies_to(&self, installation: InstallationType) -> bool {
        self.installation_types.is_empty() || self.installation_types.contains(&installation)
    }
}

/// Ordered, declarative list of plugin files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginManifest {
    pub entries: Vec<ManifestEntry>,
}

impl Default for PluginManifest {
    fn default() -> Self {
        let mut entries = vec![release_entry(
            "C2PluginLoader",
            "XAPOFX1_5",
            Path::new(MOD_CACHE_DIR).join(INJECTOR_MODULE_NAME),
            EntryKind::Injector,
        )];

        for plugin in ["C2AssetLoaderPlugin", "C2ServerPlugin", "C2BrowserPlugin"] {
            entries.push(release_entry(
                plugin,
                plugin,
                plugins_relative().join(format!("{plugin}.dll")),
                EntryKind::Plugin,
            ));
        }

        Self { entries }
    }
}

fn release_entry(
    repo: &str,
    asset: &str,
    destination: PathBuf,
    kind: EntryKind,
) -> ManifestEntry {
    let base = format!("{RELEASES_BASE_URL}/{repo}/releases/latest/download/{asset}");
    ManifestEntry {
        id: repo.to_string(),
        source_url: format!("{base}.dll"),
        debug_source_url: Some(format!("{base}_dbg.dll")),
        destination,
        sha1: None,
        kind,
        installation_types: Vec::new(),
    }
}

impl PluginManifest {
    /// Load the manifest override at `path`, falling back to the built-in
    /// manifest when the file does not exist.
    pub fn load_or_default(path: &Path) -> LauncherResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => return Err(LauncherError::io(path, e)),
        };

        let manifest: PluginManifest = serde_json::from_str(&raw)?;
        manifest.validate()?;
        info!(
            "Loaded plugin manifest override from {:?} ({} entries)",
            path,
            manifest.entries.len()
        );
        Ok(manifest)
    }

    pub fn validate(&self) -> LauncherResult<()> {
        let mut seen = HashSet::new();
        let mut destinations = HashSet::new();
        let mut injectors = 0;

        for entry in &self.entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(LauncherError::Manifest(format!(
                    "duplicate entry id '{}'",
                    entry.id
                )));
            }
            if entry.source_url.trim().is_empty() {
                return Err(LauncherError::Manifest(format!(
                    "entry '{}' has no source_url",
                    entry.id
                )));
            }
            if !is_contained_relative(&entry.destination) {
                return Err(LauncherError::Manifest(format!(
                    "entry '{}' destination {:?} must stay inside the game root",
                    entry.id, entry.destination
                )));
            }
            if !destinations.insert(normalized(&entry.destination)) {
                return Err(LauncherError::Manifest(format!(
                    "entry '{}' reuses destination {:?}",
                    entry.id, entry.destination
                )));
            }
            if entry.kind == EntryKind::Injector {
                injectors += 1;
            }
        }

        if injectors > 1 {
            return Err(LauncherError::Manifest(format!(
                "{injectors} injector entries, expected at most one"
            )));
        }
        if self.entries.is_empty() {
            warn!("Plugin manifest is empty");
        }

        Ok(())
    }

    /// Entries applicable to `installation`.
    ///
    /// Fails with `InstallationTypeNotSet` for `NotSet`.
    pub fn entries_for(
        &self,
        installation: InstallationType,
    ) -> LauncherResult<Vec<&ManifestEntry>> {
        if !installation.is_set() {
            return Err(LauncherError::InstallationTypeNotSet);
        }

        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.applies_to(installation))
            .collect())
    }

    pub fn injector(&self) -> Option<&ManifestEntry> {
        self.entries
            .iter()
            .find(|entry| entry.kind == EntryKind::Injector)
    }
}

/// Relative, without `..`, and naming at least one file below the root.
fn is_contained_relative(path: &Path) -> bool {
    let mut named = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => named = true,
            Component::CurDir => {}
            _ => return false,
        }
    }
    named
}

fn normalized(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
