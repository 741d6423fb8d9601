pub mod manager;
pub mod manifest;

pub use manager::{EntryStatus, PluginManager};
pub use manifest::{BuildFlavor, EntryKind, ManifestEntry, PluginManifest};
