use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use super::manifest::{BuildFlavor, ManifestEntry, PluginManifest};
use crate::core::downloader::{Downloader, FileTransfer};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::installation::{GameLayout, InstallationType};

/// Presence of one manifest file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStatus {
    pub id: String,
    pub path: PathBuf,
    pub present: bool,
    /// `None` when the entry has no checksum or the file is absent.
    pub checksum_ok: Option<bool>,
}

/// Installs and removes the plugin files of a game installation.
///
/// Neither operation is transactional: a failure stops at the failing entry
/// and leaves whatever was already written or deleted in place.
pub struct PluginManager {
    layout: GameLayout,
    manifest: PluginManifest,
    transfer: Arc<dyn FileTransfer>,
}

impl PluginManager {
    pub fn new(
        layout: GameLayout,
        manifest: PluginManifest,
        transfer: Arc<dyn FileTransfer>,
    ) -> Self {
        Self {
            layout,
            manifest,
            transfer,
        }
    }

    /// Absolute path of the helper module injected on modded launch.
    pub fn injector_module_path(&self) -> PathBuf {
        self.manifest
            .injector()
            .map(|entry| self.destination(entry))
            .unwrap_or_else(|| self.layout.injector_module())
    }

    fn destination(&self, entry: &ManifestEntry) -> PathBuf {
        self.layout.resolve(&entry.destination)
    }

    /// Download every manifest entry for `installation`, in order.
    pub async fn install_files(
        &self,
        installation: InstallationType,
        flavor: BuildFlavor,
    ) -> LauncherResult<()> {
        let entries = self.manifest.entries_for(installation)?;

        let cache_dir = self.layout.mod_cache_dir();
        tokio::fs::create_dir_all(&cache_dir)
            .await
            .map_err(|e| LauncherError::io(&cache_dir, e))?;

        info!(
            "Installing {} plugin files for {} ({:?} builds)",
            entries.len(),
            installation,
            flavor
        );

        for entry in entries {
            let dest = self.destination(entry);
            let url = entry.url_for(flavor);
            debug!("Fetching {} from {}", entry.id, url);
            self.transfer
                .fetch(url, &dest, entry.sha1.as_deref())
                .await?;
            info!("Installed {} -> {:?}", entry.id, dest);
        }

        Ok(())
    }

    /// Delete every manifest entry for `installation`. Missing files are
    /// skipped, so calling this twice is harmless.
    pub async fn remove_files(&self, installation: InstallationType) -> LauncherResult<()> {
        let entries = self.manifest.entries_for(installation)?;

        for entry in entries {
            let dest = self.destination(entry);
            match tokio::fs::remove_file(&dest).await {
                Ok(()) => info!("Removed {} ({:?})", entry.id, dest),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("{} not present at {:?}", entry.id, dest);
                }
                Err(e) => return Err(LauncherError::io(dest, e)),
            }
        }

        Ok(())
    }

    pub async fn status(
        &self,
        installation: InstallationType,
    ) -> LauncherResult<Vec<EntryStatus>> {
        let entries = self.manifest.entries_for(installation)?;
        let mut report = Vec::with_capacity(entries.len());

        for entry in entries {
            let path = self.destination(entry);
            let present = tokio::fs::try_exists(&path)
                .await
                .map_err(|e| LauncherError::io(&path, e))?;
            let checksum_ok = match (&entry.sha1, present) {
                (Some(expected), true) => Some(Downloader::validate_sha1(&path, expected).await?),
                _ => None,
            };
            report.push(EntryStatus {
                id: entry.id.clone(),
                path,
                present,
                checksum_ok,
            });
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::core::testing::FakeTransfer;

    fn manager_with(root: &Path, transfer: Arc<FakeTransfer>) -> PluginManager {
        PluginManager::new(GameLayout::new(root), PluginManifest::default(), transfer)
    }

    fn manifest_paths(root: &Path) -> Vec<PathBuf> {
        PluginManifest::default()
            .entries
            .iter()
            .map(|e| root.join(&e.destination))
            .collect()
    }

    #[tokio::test]
    async fn not_set_fails_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let transfer = Arc::new(FakeTransfer::default());
        let manager = manager_with(dir.path(), transfer.clone());

        let install = manager
            .install_files(InstallationType::NotSet, BuildFlavor::Release)
            .await;
        assert!(matches!(install, Err(LauncherError::InstallationTypeNotSet)));

        let remove = manager.remove_files(InstallationType::NotSet).await;
        assert!(matches!(remove, Err(LauncherError::InstallationTypeNotSet)));

        assert!(transfer.calls.lock().unwrap().is_empty());
        assert!(!dir.path().join(".mod_cache").exists());
    }

    #[tokio::test]
    async fn install_fetches_every_entry_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let transfer = Arc::new(FakeTransfer::default());
        let manager = manager_with(dir.path(), transfer.clone());

        manager
            .install_files(InstallationType::Steam, BuildFlavor::Release)
            .await
            .unwrap();

        let calls = transfer.calls.lock().unwrap().clone();
        let dests: Vec<PathBuf> = calls.iter().map(|(_, d)| d.clone()).collect();
        assert_eq!(dests, manifest_paths(dir.path()));
        assert!(calls.iter().all(|(url, _)| !url.ends_with("_dbg.dll")));
        for path in manifest_paths(dir.path()) {
            assert!(path.is_file(), "{path:?} missing");
        }
    }

    #[tokio::test]
    async fn debug_install_uses_debug_urls() {
        let dir = tempfile::tempdir().unwrap();
        let transfer = Arc::new(FakeTransfer::default());
        let manager = manager_with(dir.path(), transfer.clone());

        manager
            .install_files(InstallationType::EpicGamesStore, BuildFlavor::Debug)
            .await
            .unwrap();

        let calls = transfer.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(url, _)| url.ends_with("_dbg.dll")));
    }

    #[tokio::test]
    async fn failed_download_stops_and_keeps_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        let transfer = Arc::new(FakeTransfer::failing_on(2));
        let manager = manager_with(dir.path(), transfer.clone());

        let result = manager
            .install_files(InstallationType::Steam, BuildFlavor::Release)
            .await;
        assert!(matches!(
            result,
            Err(LauncherError::DownloadFailed { status: 404, .. })
        ));

        assert_eq!(transfer.calls.lock().unwrap().len(), 3);
        let paths = manifest_paths(dir.path());
        assert!(paths[0].is_file());
        assert!(paths[1].is_file());
        assert!(!paths[2].exists());
        assert!(!paths[3].exists());
    }

    #[tokio::test]
    async fn install_then_remove_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with(dir.path(), Arc::new(FakeTransfer::default()));

        manager
            .install_files(InstallationType::Steam, BuildFlavor::Release)
            .await
            .unwrap();
        manager.remove_files(InstallationType::Steam).await.unwrap();

        for path in manifest_paths(dir.path()) {
            assert!(!path.exists(), "{path:?} still present");
        }
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with(dir.path(), Arc::new(FakeTransfer::default()));

        manager
            .install_files(InstallationType::Steam, BuildFlavor::Release)
            .await
            .unwrap();
        manager.remove_files(InstallationType::Steam).await.unwrap();
        manager.remove_files(InstallationType::Steam).await.unwrap();
    }

    #[tokio::test]
    async fn remove_tolerates_partial_install() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with(dir.path(), Arc::new(FakeTransfer::default()));
        let paths = manifest_paths(dir.path());
        std::fs::create_dir_all(paths[1].parent().unwrap()).unwrap();
        std::fs::write(&paths[1], b"plugin").unwrap();

        manager.remove_files(InstallationType::Steam).await.unwrap();
        assert!(!paths[1].exists());
    }

    #[tokio::test]
    async fn remove_stops_at_first_undeletable_entry() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with(dir.path(), Arc::new(FakeTransfer::default()));
        let paths = manifest_paths(dir.path());
        for path in &paths {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        }
        std::fs::write(&paths[0], b"loader").unwrap();
        std::fs::create_dir(&paths[1]).unwrap();
        std::fs::write(&paths[2], b"plugin").unwrap();

        let result = manager.remove_files(InstallationType::Steam).await;
        match result {
            Err(LauncherError::Io { path, .. }) => assert_eq!(path, paths[1]),
            other => panic!("expected io error, got {other:?}"),
        }
        assert!(!paths[0].exists());
        assert!(paths[1].is_dir());
        assert!(paths[2].is_file());
    }

    #[tokio::test]
    async fn status_reports_presence() {
        let dir = tempfile::tempdir().unwrap();
        let transfer = Arc::new(FakeTransfer::failing_on(1));
        let manager = manager_with(dir.path(), transfer);
        let _ = manager
            .install_files(InstallationType::Steam, BuildFlavor::Release)
            .await;

        let report = manager.status(InstallationType::Steam).await.unwrap();
        let present: Vec<bool> = report.iter().map(|s| s.present).collect();
        assert_eq!(present, vec![true, false, false, false]);
        assert!(report.iter().all(|s| s.checksum_ok.is_none()));
    }

    #[test]
    fn injector_path_comes_from_manifest() {
        let manager = manager_with(Path::new("/games/chiv2"), Arc::new(FakeTransfer::default()));
        assert_eq!(
            manager.injector_module_path(),
            Path::new("/games/chiv2/.mod_cache/XAPOFX1_5.dll")
        );
    }
}
