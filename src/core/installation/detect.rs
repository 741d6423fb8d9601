use std::path::Path;

use tracing::{debug, warn};

use super::model::InstallationType;

const STEAM_PATH_MARKER: &str = "Steam";
const EPIC_GAMES_PATH_MARKER: &str = "Epic Games";

/// Classify the current working directory.
///
/// An unreadable working directory is not an error, it simply yields `NotSet`.
pub fn detect_installation_type() -> InstallationType {
    match std::env::current_dir() {
        Ok(cwd) => detect_installation_type_in(&cwd),
        Err(e) => {
            warn!("Cannot read current directory for auto-detect: {}", e);
            InstallationType::NotSet
        }
    }
}

/// Case-sensitive substring match on `dir`. Steam wins when both markers
/// are present.
pub fn detect_installation_type_in(dir: &Path) -> InstallationType {
    let text = dir.to_string_lossy();

    let detected = if text.contains(STEAM_PATH_MARKER) {
        InstallationType::Steam
    } else if text.contains(EPIC_GAMES_PATH_MARKER) {
        InstallationType::EpicGamesStore
    } else {
        InstallationType::NotSet
    };

    debug!("Auto-detected installation type {:?} for {:?}", detected, dir);
    detected
}
