//! Fakes behind the `FileTransfer` and `ProcessCreator` seams.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::downloader::FileTransfer;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::launch::{GameProcess, ProcessCreator, SpawnError};

/// Writes the URL as file content; fails on the configured call index.
#[derive(Default)]
pub struct FakeTransfer {
    pub calls: Mutex<Vec<(String, PathBuf)>>,
    pub fail_on_call: Option<usize>,
}

impl FakeTransfer {
    pub fn failing_on(index: usize) -> Self {
        Self {
            fail_on_call: Some(index),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl FileTransfer for FakeTransfer {
    async fn fetch(&self, url: &str, dest: &Path, _sha1: Option<&str>) -> LauncherResult<()> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((url.to_string(), dest.to_path_buf()));
            calls.len() - 1
        };
        if self.fail_on_call == Some(index) {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: 404,
            });
        }
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, url.as_bytes()).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Spawn {
        executable: PathBuf,
        args: Vec<String>,
        working_dir: Option<PathBuf>,
    },
    SpawnWithModule {
        executable: PathBuf,
        args: Vec<String>,
        working_dir: PathBuf,
        module: PathBuf,
    },
}

struct FakeProcess {
    waits: Rc<Cell<usize>>,
}

impl GameProcess for FakeProcess {
    fn id(&self) -> u32 {
        4242
    }

    fn wait(&mut self) -> std::io::Result<Option<i32>> {
        self.waits.set(self.waits.get() + 1);
        Ok(Some(0))
    }
}

/// Records every creation request. Clones share the same record.
#[derive(Clone, Default)]
pub struct FakeCreator {
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub waits: Rc<Cell<usize>>,
    pub create_error: Option<i32>,
    pub inject_error: bool,
}

impl FakeCreator {
    fn result(&self) -> Result<Box<dyn GameProcess>, SpawnError> {
        if let Some(code) = self.create_error {
            return Err(SpawnError::Create(std::io::Error::from_raw_os_error(code)));
        }
        Ok(Box::new(FakeProcess {
            waits: self.waits.clone(),
        }))
    }
}

impl ProcessCreator for FakeCreator {
    fn spawn(
        &self,
        executable: &Path,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> Result<Box<dyn GameProcess>, SpawnError> {
        self.calls.borrow_mut().push(Call::Spawn {
            executable: executable.to_path_buf(),
            args: args.to_vec(),
            working_dir: working_dir.map(Path::to_path_buf),
        });
        self.result()
    }

    fn spawn_with_module(
        &self,
        executable: &Path,
        args: &[String],
        working_dir: &Path,
        module: &Path,
    ) -> Result<Box<dyn GameProcess>, SpawnError> {
        self.calls.borrow_mut().push(Call::SpawnWithModule {
            executable: executable.to_path_buf(),
            args: args.to_vec(),
            working_dir: working_dir.to_path_buf(),
            module: module.to_path_buf(),
        });
        if self.inject_error {
            return Err(SpawnError::Inject(std::io::Error::other("apc rejected")));
        }
        self.result()
    }
}
