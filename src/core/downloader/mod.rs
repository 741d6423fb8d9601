pub mod client;

use std::path::Path;

use async_trait::async_trait;

use crate::core::error::LauncherResult;

pub use client::Downloader;

/// Fetches a remote resource into a local file, replacing prior content.
#[async_trait]
pub trait FileTransfer: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path, sha1: Option<&str>) -> LauncherResult<()>;
}
