// ─── Process creation ───
// Plain and module-injecting process creation behind one trait so the
// launcher can be driven by a fake in tests.

use std::path::Path;

use tracing::debug;

/// Why a process could not be started.
#[derive(Debug)]
pub enum SpawnError {
    /// The OS refused to create the process.
    Create(std::io::Error),
    /// The process was created but the module could not be injected. The
    /// child has already been terminated.
    Inject(std::io::Error),
}

/// A running child. Dropping it releases the OS handles without killing it.
pub trait GameProcess {
    fn id(&self) -> u32;

    /// Block until the process exits, with no timeout.
    fn wait(&mut self) -> std::io::Result<Option<i32>>;
}

pub trait ProcessCreator {
    fn spawn(
        &self,
        executable: &Path,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> Result<Box<dyn GameProcess>, SpawnError>;

    fn spawn_with_module(
        &self,
        executable: &Path,
        args: &[String],
        working_dir: &Path,
        module: &Path,
    ) -> Result<Box<dyn GameProcess>, SpawnError>;
}

/// Creates real OS processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessCreator;

impl ProcessCreator for SystemProcessCreator {
    fn spawn(
        &self,
        executable: &Path,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> Result<Box<dyn GameProcess>, SpawnError> {
        let mut cmd = std::process::Command::new(executable);
        cmd.args(args);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        debug!("Command: {:?}", cmd);
        let child = cmd.spawn().map_err(SpawnError::Create)?;
        Ok(Box::new(ChildProcess(child)))
    }

    #[cfg(windows)]
    fn spawn_with_module(
        &self,
        executable: &Path,
        args: &[String],
        working_dir: &Path,
        module: &Path,
    ) -> Result<Box<dyn GameProcess>, SpawnError> {
        let process = super::inject::create_with_module(executable, args, working_dir, module)?;
        Ok(Box::new(process))
    }

    #[cfg(not(windows))]
    fn spawn_with_module(
        &self,
        executable: &Path,
        _args: &[String],
        _working_dir: &Path,
        _module: &Path,
    ) -> Result<Box<dyn GameProcess>, SpawnError> {
        Err(SpawnError::Create(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!(
                "module injection into {:?} is only available on Windows",
                executable
            ),
        )))
    }
}

struct ChildProcess(std::process::Child);

impl GameProcess for ChildProcess {
    fn id(&self) -> u32 {
        self.0.id()
    }

    fn wait(&mut self) -> std::io::Result<Option<i32>> {
        Ok(self.0.wait()?.code())
    }
}
