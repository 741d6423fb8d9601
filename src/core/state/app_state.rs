use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use super::settings::{LauncherSettings, SettingsFile};
use crate::core::downloader::{Downloader, FileTransfer};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::installation::{detect_installation_type_in, GameLayout, InstallationType};
use crate::core::launch::{ProcessCreator, ProcessLauncher, SystemProcessCreator};
use crate::core::plugins::{BuildFlavor, PluginManager, PluginManifest};

/// Everything one launcher session needs, wired for a single game root.
pub struct AppState<C = SystemProcessCreator> {
    pub layout: GameLayout,
    pub settings_file: SettingsFile,
    pub settings: LauncherSettings,
    pub plugin_manager: PluginManager,
    pub launcher: ProcessLauncher<C>,
}

impl AppState<SystemProcessCreator> {
    /// Load settings and the plugin manifest for the game installed at `root`.
    pub fn new(root: PathBuf) -> LauncherResult<Self> {
        let transfer: Arc<dyn FileTransfer> = Arc::new(Downloader::new()?);
        Self::with_parts(root, transfer, SystemProcessCreator)
    }
}

impl<C: ProcessCreator> AppState<C> {
    pub fn with_parts(
        root: PathBuf,
        transfer: Arc<dyn FileTransfer>,
        creator: C,
    ) -> LauncherResult<Self> {
        let root = std::path::absolute(&root).map_err(|e| LauncherError::io(&root, e))?;
        let layout = GameLayout::new(root);

        let settings_file = SettingsFile::new(layout.settings_path());
        let defaults =
            LauncherSettings::with_installation_type(detect_installation_type_in(layout.root()));
        let settings = settings_file.load_or(defaults);

        let manifest = PluginManifest::load_or_default(&layout.manifest_path())?;
        let plugin_manager = PluginManager::new(layout.clone(), manifest, transfer);
        let launcher = ProcessLauncher::new(
            layout.clone(),
            plugin_manager.injector_module_path(),
            creator,
        );

        info!(
            "Game root {:?}, installation type {}",
            layout.root(),
            settings.installation_type
        );

        Ok(Self {
            layout,
            settings_file,
            settings,
            plugin_manager,
            launcher,
        })
    }

    /// Explicit choice first, then the stored setting.
    pub fn installation_type(&self, explicit: Option<InstallationType>) -> InstallationType {
        explicit.unwrap_or(self.settings.installation_type)
    }

    pub fn build_flavor(&self) -> BuildFlavor {
        BuildFlavor::from_plugin_logging(self.settings.enable_plugin_logging)
    }

    pub fn save_settings(&self) -> LauncherResult<()> {
        self.settings_file.save(&self.settings)
    }
}
