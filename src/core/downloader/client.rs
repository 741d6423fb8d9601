use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::FileTransfer;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::build_http_client;

/// Sequential HTTPS downloader with status, size and SHA-1 validation.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new() -> LauncherResult<Self> {
        Ok(Self {
            client: build_http_client()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Download a single file to `dest`, optionally validating SHA-1.
    ///
    /// Creates parent directories as needed. Nothing is written unless the
    /// response passes validation, so a failed download never truncates an
    /// existing file.
    pub async fn download_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
    ) -> LauncherResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        check_payload(url, dest, &bytes, sha1_expected)?;

        // Scoped so the handle is closed before the caller touches the file again
        {
            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(|e| LauncherError::io(dest, e))?;
            file.write_all(&bytes)
                .await
                .map_err(|e| LauncherError::io(dest, e))?;
            file.flush().await.map_err(|e| LauncherError::io(dest, e))?;
        }

        debug!("Downloaded: {} -> {:?} ({} bytes)", url, dest, bytes.len());
        Ok(())
    }

    /// Validate an existing file's SHA-1.
    pub async fn validate_sha1(path: &Path, expected: &str) -> LauncherResult<bool> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        Ok(sha1_hex(&bytes).eq_ignore_ascii_case(expected))
    }
}

#[async_trait]
impl FileTransfer for Downloader {
    async fn fetch(&self, url: &str, dest: &Path, sha1: Option<&str>) -> LauncherResult<()> {
        self.download_file(url, dest, sha1).await
    }
}

fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Reject empty bodies and checksum mismatches.
fn check_payload(
    url: &str,
    dest: &Path,
    bytes: &[u8],
    sha1_expected: Option<&str>,
) -> LauncherResult<()> {
    if bytes.is_empty() {
        return Err(LauncherError::EmptyDownload {
            url: url.to_string(),
        });
    }

    if let Some(expected) = sha1_expected {
        let actual = sha1_hex(bytes);
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(LauncherError::Sha1Mismatch {
                path: dest.to_path_buf(),
                expected: expected.to_string(),
                actual,
            });
        }
    }

    Ok(())
}
