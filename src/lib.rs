mod cli;
mod commands;
pub mod core;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::installation::{detect_installation_type, detect_installation_type_in};
use crate::core::state::AppState;

pub fn run() -> ExitCode {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,unchained_launcher_lib=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Cannot start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(dispatch(cli)) {
        Ok(code) => code,
        Err(LauncherError::InstallationTypeNotSet) => {
            tracing::warn!("{}", commands::NOT_DETECTED_WARNING);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> LauncherResult<ExitCode> {
    let root_given = cli.root.is_some();
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().map_err(|e| LauncherError::io(".", e))?,
    };
    let mut state = AppState::new(root)?;

    match cli.command {
        Command::Detect => {
            let detected = if root_given {
                detect_installation_type_in(state.layout.root())
            } else {
                detect_installation_type()
            };
            if !commands::detect_installation(&state, detected) {
                return Ok(ExitCode::from(2));
            }
        }
        Command::Install {
            installation,
            debug,
        } => commands::install_plugins(&state, installation, debug).await?,
        Command::Remove { installation } => commands::remove_plugins(&state, installation).await?,
        Command::Status { installation } => commands::plugin_status(&state, installation).await?,
        Command::Launch {
            vanilla,
            no_update,
            args,
        } => {
            let exit = commands::launch_game(&state, vanilla, no_update, args).await?;
            tracing::info!("Game session ended (exit code {:?})", exit);
        }
        Command::Settings { action } => commands::settings(&mut state, action)?,
    }

    Ok(ExitCode::SUCCESS)
}
