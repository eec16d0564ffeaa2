//! `bundle-manifest.json`, written by the packager and read at startup.

use super::StartupError;
use crate::bundler::DataKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the manifest inside a resource root.
pub const MANIFEST_FILE: &str = "bundle-manifest.json";

/// Description of what a packaged build carries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleManifest {
    pub name: String,
    pub version: String,
    /// Version of the hidden-import list the build was made against.
    pub hidden_imports_version: u32,
    pub hidden_imports: Vec<String>,
    pub data_files: Vec<ManifestEntry>,
    /// Whether the build keeps a console window (Windows).
    pub console: bool,
}

/// One bundled file, relative to the resource root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub destination: String,
    pub kind: DataKind,
}

impl BundleManifest {
    /// Reads `<dir>/bundle-manifest.json`.
    pub fn read_from(dir: &Path) -> Result<Self, StartupError> {
        let path = dir.join(MANIFEST_FILE);
        let bytes =
            std::fs::read(&path).map_err(StartupError::io("reading bundle manifest", &path))?;
        serde_json::from_slice(&bytes).map_err(|source| StartupError::Manifest { path, source })
    }

    /// Serializes the manifest as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Destinations of the bundled files under `prefix/`.
    pub fn files_under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.data_files.iter().filter_map(move |entry| {
            entry
                .destination
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('/'))
                .map(|_| entry.destination.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_written_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = BundleManifest {
            name: "VideoDownloader".into(),
            version: "1.0.0".into(),
            hidden_imports_version: 1,
            hidden_imports: vec!["eframe.glow".into()],
            data_files: vec![
                ManifestEntry {
                    destination: "qt_material/dark_teal.xml".into(),
                    kind: DataKind::Data,
                },
                ManifestEntry {
                    destination: "README.md".into(),
                    kind: DataKind::Data,
                },
            ],
            console: false,
        };
        std::fs::write(dir.path().join(MANIFEST_FILE), manifest.to_json().unwrap()).unwrap();

        let read = BundleManifest::read_from(dir.path()).unwrap();
        assert_eq!(read, manifest);
        assert_eq!(
            read.files_under("qt_material").collect::<Vec<_>>(),
            vec!["qt_material/dark_teal.xml"]
        );
    }

    #[test]
    fn malformed_manifest_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "{ not json").unwrap();
        assert!(matches!(
            BundleManifest::read_from(dir.path()),
            Err(StartupError::Manifest { .. })
        ));
    }
}
