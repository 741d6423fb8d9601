// ─── Unchained Launcher Core ───
// Plugin lifecycle and modded launch for a Chivalry 2 installation.
//
// Architecture:
//   core/
//     installation/ — Installation type, auto-detect, game directory layout
//     downloader/   — File transfer with status + SHA-1 validation
//     plugins/      — Declarative manifest + install/remove manager
//     launch/       — Launch planning, process creation, module injection
//     state/        — Settings file + per-session application state

pub mod downloader;
pub mod error;
pub mod http;
pub mod installation;
pub mod launch;
pub mod plugins;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
