use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::installation::InstallationType;

#[derive(Parser, Debug)]
#[command(name = "unchained-launcher")]
#[command(about = "Install Chivalry 2 mod-loader plugins and launch the game", long_about = None)]
pub struct Cli {
    /// Game installation root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect the installation type from the game root path
    Detect,

    /// Download the plugin files
    Install {
        #[arg(short, long, value_name = "TYPE")]
        installation: Option<InstallationType>,

        /// Fetch the logging (_dbg) plugin builds
        #[arg(long)]
        debug: bool,
    },

    /// Delete the plugin files
    Remove {
        #[arg(short, long, value_name = "TYPE")]
        installation: Option<InstallationType>,
    },

    /// Show which plugin files are present
    Status {
        #[arg(short, long, value_name = "TYPE")]
        installation: Option<InstallationType>,
    },

    /// Launch the game and wait for it to exit
    Launch {
        /// Run the original launcher without mods
        #[arg(long)]
        vanilla: bool,

        /// Skip the automatic plugin update before a modded launch
        #[arg(long)]
        no_update: bool,

        /// Arguments passed through to the game
        #[arg(last = true, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Show or change launcher settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    Show,
    Set {
        #[arg(long, value_name = "TYPE")]
        installation: Option<InstallationType>,

        #[arg(long, value_name = "BOOL")]
        plugin_logging: Option<bool>,

        #[arg(long, value_name = "BOOL")]
        auto_update: Option<bool>,
    },
}
