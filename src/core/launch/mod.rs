#[cfg(windows)]
pub mod inject;
pub mod process;
pub mod request;
pub mod task;

pub use process::{GameProcess, ProcessCreator, SpawnError, SystemProcessCreator};
pub use request::{LaunchPlan, LaunchRequest};
pub use task::ProcessLauncher;
