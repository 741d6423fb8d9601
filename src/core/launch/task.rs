// ─── Launch Task ───
// Resolves a launch request against the game layout, starts the game and
// blocks until it exits.

use std::path::PathBuf;

use tracing::{debug, info};

use super::process::{ProcessCreator, SpawnError, SystemProcessCreator};
use super::request::{LaunchPlan, LaunchRequest};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::installation::GameLayout;

pub struct ProcessLauncher<C = SystemProcessCreator> {
    layout: GameLayout,
    injector_module: PathBuf,
    creator: C,
}

impl<C: ProcessCreator> ProcessLauncher<C> {
    pub fn new(layout: GameLayout, injector_module: PathBuf, creator: C) -> Self {
        Self {
            layout,
            injector_module,
            creator,
        }
    }

    /// Modded launches run the shipping binary from the binaries directory
    /// with the helper module injected; vanilla launches run the original
    /// storefront launcher from the caller's working directory.
    pub fn plan(&self, request: &LaunchRequest) -> LaunchPlan {
        if request.modded {
            LaunchPlan {
                executable: self.layout.modded_executable(),
                args: request.args.clone(),
                working_dir: Some(self.layout.binaries_dir()),
                inject: Some(self.injector_module.clone()),
            }
        } else {
            LaunchPlan {
                executable: self.layout.vanilla_executable(),
                args: request.args.clone(),
                working_dir: None,
                inject: None,
            }
        }
    }

    /// Start the game and block until it exits. Returns the exit code when
    /// the OS reports one.
    pub fn launch_game(&self, request: &LaunchRequest) -> LauncherResult<Option<i32>> {
        let plan = self.plan(request);
        let command_line = plan.command_line();

        info!(
            "Launching {} game: {:?}",
            if request.modded { "modded" } else { "vanilla" },
            plan.executable
        );
        debug!("Command line: {}", command_line);

        let spawned = match (&plan.inject, &plan.working_dir) {
            (Some(module), Some(working_dir)) => {
                if !module.is_file() {
                    return Err(LauncherError::Injection(format!(
                        "helper module {:?} is missing, install the plugin files first",
                        module
                    )));
                }
                self.creator
                    .spawn_with_module(&plan.executable, &plan.args, working_dir, module)
            }
            _ => self
                .creator
                .spawn(&plan.executable, &plan.args, plan.working_dir.as_deref()),
        };

        let mut child = match spawned {
            Ok(child) => child,
            Err(SpawnError::Create(source)) => {
                return Err(LauncherError::ProcessLaunch {
                    code: source.raw_os_error(),
                    command_line,
                    cwd: std::env::current_dir().unwrap_or_default(),
                    source,
                });
            }
            Err(SpawnError::Inject(source)) => {
                return Err(LauncherError::Injection(format!(
                    "{:?} into {:?}: {}",
                    plan.inject, plan.executable, source
                )));
            }
        };

        let pid = child.id();
        info!("Game running with PID {}, waiting for exit", pid);

        let exit_code = child
            .wait()
            .map_err(|e| LauncherError::io(&plan.executable, e))?;

        info!("Game (PID {}) exited with code {:?}", pid, exit_code);
        Ok(exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{Call, FakeCreator};

    fn game_root() -> (tempfile::TempDir, GameLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = GameLayout::new(dir.path());
        std::fs::create_dir_all(layout.mod_cache_dir()).unwrap();
        std::fs::write(layout.injector_module(), b"MZ").unwrap();
        (dir, layout)
    }

    fn launcher_for(layout: &GameLayout, creator: &FakeCreator) -> ProcessLauncher<FakeCreator> {
        ProcessLauncher::new(layout.clone(), layout.injector_module(), creator.clone())
    }

    fn args() -> Vec<String> {
        vec!["--server-name".into(), "Two Words".into()]
    }

    #[test]
    fn vanilla_uses_plain_creation_and_inherits_cwd() {
        let (_dir, layout) = game_root();
        let creator = FakeCreator::default();
        let launcher = launcher_for(&layout, &creator);

        let code = launcher.launch_game(&LaunchRequest::vanilla(args())).unwrap();

        assert_eq!(code, Some(0));
        assert_eq!(
            *creator.calls.borrow(),
            vec![Call::Spawn {
                executable: layout.vanilla_executable(),
                args: args(),
                working_dir: None,
            }]
        );
        assert_eq!(creator.waits.get(), 1);
    }

    #[test]
    fn modded_injects_helper_from_binaries_dir() {
        let (_dir, layout) = game_root();
        let creator = FakeCreator::default();
        let launcher = launcher_for(&layout, &creator);

        launcher.launch_game(&LaunchRequest::modded(args())).unwrap();

        assert_eq!(
            *creator.calls.borrow(),
            vec![Call::SpawnWithModule {
                executable: layout.modded_executable(),
                args: args(),
                working_dir: layout.binaries_dir(),
                module: layout.injector_module(),
            }]
        );
        assert_eq!(creator.waits.get(), 1);
    }

    #[test]
    fn creation_failure_carries_code_and_command_line() {
        let (_dir, layout) = game_root();
        let creator = FakeCreator {
            create_error: Some(2),
            ..Default::default()
        };
        let launcher = launcher_for(&layout, &creator);
        let request = LaunchRequest::vanilla(args());
        let expected_command_line = launcher.plan(&request).command_line();

        let err = launcher.launch_game(&request).unwrap_err();

        match err {
            LauncherError::ProcessLaunch {
                code,
                command_line,
                cwd,
                ..
            } => {
                assert_eq!(code, Some(2));
                assert_eq!(command_line, expected_command_line);
                assert!(command_line.ends_with(r#"--server-name "Two Words""#));
                assert_eq!(cwd, std::env::current_dir().unwrap());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(creator.waits.get(), 0);
    }

    #[test]
    fn injection_failure_is_reported_without_wait() {
        let (_dir, layout) = game_root();
        let creator = FakeCreator {
            inject_error: true,
            ..Default::default()
        };
        let launcher = launcher_for(&layout, &creator);

        let err = launcher
            .launch_game(&LaunchRequest::modded(Vec::new()))
            .unwrap_err();

        assert!(matches!(err, LauncherError::Injection(_)));
        assert_eq!(creator.waits.get(), 0);
    }

    #[test]
    fn missing_helper_module_fails_before_creation() {
        let dir = tempfile::tempdir().unwrap();
        let layout = GameLayout::new(dir.path());
        let creator = FakeCreator::default();
        let launcher = launcher_for(&layout, &creator);

        let err = launcher
            .launch_game(&LaunchRequest::modded(Vec::new()))
            .unwrap_err();

        assert!(matches!(err, LauncherError::Injection(_)));
        assert!(creator.calls.borrow().is_empty());
    }
}
