use std::path::{Path, PathBuf};

pub const MOD_CACHE_DIR: &str = ".mod_cache";
pub const INJECTOR_MODULE_NAME: &str = "XAPOFX1_5.dll";
const MODDED_EXECUTABLE_NAME: &str = "Chivalry2-Win64-Shipping.exe";
const VANILLA_EXECUTABLE_NAME: &str = "Chivalry2Launcher-ORIGINAL.exe";

/// Fixed directory structure of a game installation.
///
/// Steam and Epic Games Store installs share the same layout below the
/// game root:
/// - `.mod_cache/`                 — launcher cache, injector module, settings
/// - `TBL/Binaries/Win64/`         — shipping executable
/// - `TBL/Binaries/Win64/Plugins/` — plugins loaded by the injector
/// - `Chivalry2Launcher-ORIGINAL.exe` — the untouched storefront launcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLayout {
    root: PathBuf,
}

impl GameLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a path relative to the game root.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    pub fn mod_cache_dir(&self) -> PathBuf {
        self.root.join(MOD_CACHE_DIR)
    }

    /// Working directory of a modded launch.
    pub fn binaries_dir(&self) -> PathBuf {
        self.root.join(binaries_relative())
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.binaries_dir().join("Plugins")
    }

    pub fn modded_executable(&self) -> PathBuf {
        self.binaries_dir().join(MODDED_EXECUTABLE_NAME)
    }

    pub fn vanilla_executable(&self) -> PathBuf {
        self.root.join(VANILLA_EXECUTABLE_NAME)
    }

    /// Default location of the injected helper module.
    pub fn injector_module(&self) -> PathBuf {
        self.mod_cache_dir().join(INJECTOR_MODULE_NAME)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.mod_cache_dir().join("unchained_launcher_settings.json")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.mod_cache_dir().join("plugin_manifest.json")
    }
}

pub fn binaries_relative() -> PathBuf {
    ["TBL", "Binaries", "Win64"].iter().collect()
}

pub fn plugins_relative() -> PathBuf {
    binaries_relative().join("Plugins")
}
