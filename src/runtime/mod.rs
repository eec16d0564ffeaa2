//! Packaged application startup.
//!
//! Finds the directory the running application loads its bundled data from
//! (the "resource root"), verifies the hidden-import list recorded at build
//! time, and reports startup failures where a windowed application can
//! surface them: a log file and a native error dialog.
//!
//! Resource roots are tried in order:
//!
//! 1. a payload appended to the executable, extracted once into
//!    `<cache>/VideoDownloader/<digest>/`
//! 2. `<exe_dir>/../Resources` holding a manifest (macOS `.app`)
//! 3. `<exe_dir>` holding a manifest (folder build)
//! 4. none: a development run using the compiled-in themes

mod error;
mod manifest;
mod modules;
mod payload;

pub use error::StartupError;
pub use manifest::{BundleManifest, MANIFEST_FILE, ManifestEntry};
pub use modules::{HIDDEN_IMPORTS_VERSION, REGISTRY, is_available, verify_hidden_imports};
pub use payload::{FLAG_COMPRESSED, MAGIC, PayloadTrailer, TRAILER_LEN, read_payload, unpack};

use sha2::{Digest, Sha256};
use std::{
    fmt::Display,
    io::Write,
    path::{Path, PathBuf},
};

/// Per-user directory name used for caches, logs and downloads.
pub const APP_DIR: &str = "VideoDownloader";

/// File startup failures are appended to, under the local data directory.
pub const STARTUP_LOG: &str = "startup-error.log";

const COMPLETE_MARKER: &str = ".complete";

/// Where the resource root was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceSource {
    /// Extracted from the executable's payload.
    Payload,
    /// `Contents/Resources` of a macOS bundle.
    AppBundle,
    /// Next to the executable.
    Folder,
    /// Not packaged.
    Development,
}

/// Located resources of the running application.
#[derive(Clone, Debug)]
pub struct Resources {
    pub source: ResourceSource,
    pub root: Option<PathBuf>,
    pub manifest: Option<BundleManifest>,
}

impl Resources {
    /// Locates the resources of the current executable.
    pub fn locate() -> Result<Self, StartupError> {
        let exe = std::env::current_exe().map_err(StartupError::io("locating executable", "."))?;
        let cache = dirs::cache_dir().map(|dir| dir.join(APP_DIR));
        Self::locate_from(&exe, cache.as_deref())
    }

    /// Locates resources for `exe`, extracting payloads below `cache`.
    pub fn locate_from(exe: &Path, cache: Option<&Path>) -> Result<Self, StartupError> {
        if let Some((trailer, payload)) = read_payload(exe)? {
            let cache = cache.ok_or(StartupError::NoCacheDir)?;
            let root = extract_payload(&payload, trailer.compressed(), cache)?;
            let manifest = BundleManifest::read_from(&root)?;
            log::info!("Using bundled resources extracted to {}", root.display());
            return Ok(Self {
                source: ResourceSource::Payload,
                root: Some(root),
                manifest: Some(manifest),
            });
        }

        if let Some(exe_dir) = exe.parent() {
            let candidates = [
                (exe_dir.join("..").join("Resources"), ResourceSource::AppBundle),
                (exe_dir.to_path_buf(), ResourceSource::Folder),
            ];
            for (dir, source) in candidates {
                if dir.join(MANIFEST_FILE).is_file() {
                    let manifest = BundleManifest::read_from(&dir)?;
                    log::info!("Using bundled resources in {}", dir.display());
                    return Ok(Self {
                        source,
                        root: Some(dir),
                        manifest: Some(manifest),
                    });
                }
            }
        }

        log::debug!("No bundled resources found, using built-in themes");
        Ok(Self {
            source: ResourceSource::Development,
            root: None,
            manifest: None,
        })
    }

    /// Verifies the hidden imports recorded in the manifest, if any.
    pub fn verify(&self) -> Result<(), StartupError> {
        match &self.manifest {
            Some(manifest) => verify_hidden_imports(manifest),
            None => Ok(()),
        }
    }

    /// Directory holding the bundled theme files.
    pub fn theme_dir(&self) -> Option<PathBuf> {
        self.root
            .as_ref()
            .map(|root| root.join(qt_material::LIBRARY_NAME))
            .filter(|dir| dir.is_dir())
    }

    /// Loads a theme from the bundle, falling back to the compiled-in copy.
    pub fn theme(&self, name: &str) -> Result<qt_material::Theme, qt_material::ThemeError> {
        match self.theme_dir() {
            Some(dir) => qt_material::load_theme(&dir, name).or_else(|err| {
                log::warn!("{err}; falling back to built-in theme");
                qt_material::builtin(name)
            }),
            None => qt_material::builtin(name),
        }
    }
}

/// Extracts a payload into `cache/<digest>`, reusing a complete extraction.
fn extract_payload(payload: &[u8], compressed: bool, cache: &Path) -> Result<PathBuf, StartupError> {
    let digest = format!("{:x}", Sha256::digest(payload));
    let root = cache.join(&digest[..16]);
    if root.join(COMPLETE_MARKER).is_file() {
        return Ok(root);
    }

    let staging = cache.join(format!("{}.partial-{}", &digest[..16], std::process::id()));
    if staging.exists() {
        std::fs::remove_dir_all(&staging)
            .map_err(StartupError::io("clearing extraction directory", &staging))?;
    }
    std::fs::create_dir_all(&staging)
        .map_err(StartupError::io("creating extraction directory", &staging))?;
    unpack(payload, compressed, &staging)?;
    std::fs::write(staging.join(COMPLETE_MARKER), b"")
        .map_err(StartupError::io("marking extraction complete", &staging))?;

    install_extraction(&staging, &root)
}

/// Moves a complete `staging` directory to `root`.
///
/// A complete `root` left by a concurrent start is kept and `staging` is
/// discarded.
fn install_extraction(staging: &Path, root: &Path) -> Result<PathBuf, StartupError> {
    if root.join(COMPLETE_MARKER).is_file() {
        let _ = std::fs::remove_dir_all(staging);
        return Ok(root.to_path_buf());
    }
    if root.exists() {
        // Left over from an interrupted extraction.
        let _ = std::fs::remove_dir_all(root);
    }
    match std::fs::rename(staging, root) {
        Ok(()) => Ok(root.to_path_buf()),
        Err(_) if root.join(COMPLETE_MARKER).is_file() => {
            let _ = std::fs::remove_dir_all(staging);
            Ok(root.to_path_buf())
        }
        Err(source) => Err(StartupError::Io {
            context: "moving extracted resources into place",
            path: root.to_path_buf(),
            source,
        }),
    }
}

/// Appends a timestamped startup failure to `dir/startup-error.log`.
pub fn append_startup_log(dir: &Path, message: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(STARTUP_LOG);
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        message
    )?;
    Ok(path)
}

/// Reports a fatal startup failure through the log file and a native dialog.
///
/// The caller exits with status 1 afterwards.
pub fn report_startup_failure(error: &dyn Display) {
    let message = error.to_string();
    log::error!("Startup failed: {}", message);

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR);
    let details = match append_startup_log(&log_dir, &message) {
        Ok(path) => format!("{message}\n\nDetails were written to {}", path.display()),
        Err(e) => {
            log::warn!("Could not write startup log: {}", e);
            message
        }
    };

    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("VideoDownloader failed to start")
        .set_description(details)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_build_manifest_is_found_next_to_executable() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("VideoDownloader");
        std::fs::write(&exe, b"binary").unwrap();
        let manifest = BundleManifest {
            name: "VideoDownloader".into(),
            version: "1.0.0".into(),
            hidden_imports_version: HIDDEN_IMPORTS_VERSION,
            hidden_imports: vec!["egui.widgets".into()],
            data_files: Vec::new(),
            console: false,
        };
        std::fs::write(dir.path().join(MANIFEST_FILE), manifest.to_json().unwrap()).unwrap();

        let resources = Resources::locate_from(&exe, None).unwrap();
        assert_eq!(resources.source, ResourceSource::Folder);
        assert_eq!(resources.manifest, Some(manifest));
        assert!(resources.verify().is_ok());
    }

    #[test]
    fn development_run_uses_builtin_themes() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("video-downloader");
        std::fs::write(&exe, b"binary").unwrap();

        let resources = Resources::locate_from(&exe, None).unwrap();
        assert_eq!(resources.source, ResourceSource::Development);
        assert!(resources.verify().is_ok());
        assert_eq!(
            resources.theme(qt_material::DEFAULT_THEME).unwrap().name(),
            qt_material::DEFAULT_THEME
        );
    }

    #[test]
    fn complete_extraction_from_another_start_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("0123456789abcdef");
        let staging = dir.path().join("0123456789abcdef.partial-1");
        for path in [&root, &staging] {
            std::fs::create_dir_all(path).unwrap();
            std::fs::write(path.join(COMPLETE_MARKER), b"").unwrap();
        }
        std::fs::write(root.join("in-use.xml"), "<resources/>").unwrap();

        assert_eq!(install_extraction(&staging, &root).unwrap(), root);
        assert!(root.join("in-use.xml").is_file());
        assert!(!staging.exists());
    }

    #[test]
    fn incomplete_root_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("0123456789abcdef");
        let staging = dir.path().join("0123456789abcdef.partial-1");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("stale.xml"), "").unwrap();
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::write(staging.join(COMPLETE_MARKER), b"").unwrap();
        std::fs::write(staging.join("fresh.xml"), "").unwrap();

        assert_eq!(install_extraction(&staging, &root).unwrap(), root);
        assert!(root.join("fresh.xml").is_file());
        assert!(!root.join("stale.xml").exists());
        assert!(!staging.exists());
    }

    #[test]
    fn startup_log_appends() {
        let dir = tempfile::tempdir().unwrap();
        append_startup_log(dir.path(), "first").unwrap();
        let path = append_startup_log(dir.path(), "second").unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().nth(1).unwrap().ends_with("second"));
    }
}
