use serde::{Deserialize, Serialize};

/// Storefront a local game installation came from.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum,
)]
pub enum InstallationType {
    #[default]
    NotSet,
    Steam,
    #[value(alias = "egs")]
    EpicGamesStore,
}

impl InstallationType {
    /// Human readable label shown to the user.
    pub const fn display_name(self) -> &'static str {
        match self {
            InstallationType::NotSet => "Not Set",
            InstallationType::Steam => "Steam",
            InstallationType::EpicGamesStore => "Epic Games Store",
        }
    }

    pub fn is_set(self) -> bool {
        self != InstallationType::NotSet
    }
}

impl std::fmt::Display for InstallationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
