use tracing::{info, warn};

use crate::cli::SettingsAction;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::installation::InstallationType;
use crate::core::launch::{LaunchRequest, ProcessCreator};
use crate::core::plugins::BuildFlavor;
use crate::core::state::AppState;

pub const NOT_DETECTED_WARNING: &str =
    "Could not detect installation type. Please set it manually with `settings set --installation <TYPE>`.";

/// Report a detection result against the stored setting. Returns whether
/// detection succeeded.
pub fn detect_installation<C>(state: &AppState<C>, detected: InstallationType) -> bool {
    println!("Installation type: {}", detected);

    if detected == InstallationType::NotSet {
        warn!("{}", NOT_DETECTED_WARNING);
        return false;
    }

    if detected != state.settings.installation_type {
        info!(
            "Detected {} but settings hold {}; use `settings set` to store it",
            detected, state.settings.installation_type
        );
    }
    true
}

pub async fn install_plugins(
    state: &AppState,
    installation: Option<InstallationType>,
    debug: bool,
) -> LauncherResult<()> {
    let installation = state.installation_type(installation);
    let flavor = if debug {
        BuildFlavor::Debug
    } else {
        state.build_flavor()
    };

    state
        .plugin_manager
        .install_files(installation, flavor)
        .await?;
    println!("Plugin files installed for {}", installation);
    Ok(())
}

pub async fn remove_plugins(
    state: &AppState,
    installation: Option<InstallationType>,
) -> LauncherResult<()> {
    let installation = state.installation_type(installation);
    state.plugin_manager.remove_files(installation).await?;
    println!("Plugin files removed for {}", installation);
    Ok(())
}

pub async fn plugin_status(
    state: &AppState,
    installation: Option<InstallationType>,
) -> LauncherResult<()> {
    let installation = state.installation_type(installation);
    let report = state.plugin_manager.status(installation).await?;

    for entry in report {
        let checksum = match entry.checksum_ok {
            Some(true) => " (checksum ok)",
            Some(false) => " (checksum MISMATCH)",
            None => "",
        };
        println!(
            "{:<22} {:<8} {}{}",
            entry.id,
            if entry.present { "present" } else { "missing" },
            entry.path.display(),
            checksum
        );
    }
    Ok(())
}

/// Modded launches refresh the plugins first when automatic updates are on.
/// Blocks until the game exits.
pub async fn launch_game<C: ProcessCreator>(
    state: &AppState<C>,
    vanilla: bool,
    no_update: bool,
    args: Vec<String>,
) -> LauncherResult<Option<i32>> {
    let request = if vanilla {
        LaunchRequest::vanilla(args)
    } else {
        LaunchRequest::modded(args)
    };

    if request.modded {
        let installation = state.installation_type(None);
        if !installation.is_set() {
            return Err(LauncherError::InstallationTypeNotSet);
        }

        if state.settings.enable_plugin_automatic_updates && !no_update {
            info!("Updating plugin files before launch");
            state
                .plugin_manager
                .install_files(installation, state.build_flavor())
                .await?;
        }
    }

    state.launcher.launch_game(&request)
}

pub fn settings(state: &mut AppState, action: SettingsAction) -> LauncherResult<()> {
    match action {
        SettingsAction::Show => {}
        SettingsAction::Set {
            installation,
            plugin_logging,
            auto_update,
        } => {
            if let Some(installation) = installation {
                state.settings.installation_type = installation;
            }
            if let Some(enabled) = plugin_logging {
                state.settings.enable_plugin_logging = enabled;
            }
            if let Some(enabled) = auto_update {
                state.settings.enable_plugin_automatic_updates = enabled;
            }
            state.save_settings()?;
            info!("Saved settings to {:?}", state.settings_file.path());
        }
    }

    let settings = &state.settings;
    println!("Installation type:          {}", settings.installation_type);
    println!("Plugin logging (_dbg DLLs): {}", settings.enable_plugin_logging);
    println!(
        "Automatic plugin updates:   {}",
        settings.enable_plugin_automatic_updates
    );
    Ok(())
}
