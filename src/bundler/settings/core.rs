//! Core Settings struct and implementations.

use super::{BundleBinary, BundleMetadata, BundleSettings, PackageSettings, Subsystem};
use crate::bundler::{harvest::ThemeLibrary, platform::Platform};
use std::path::{Path, PathBuf};

/// Validated settings for one build invocation.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder), held for the
/// duration of the build and then dropped.
///
/// # Examples
///
/// ```no_run
/// use video_downloader::bundler::{BundleSettings, PackageSettings, Platform, SettingsBuilder};
///
/// # fn example() -> video_downloader::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root(".")
///     .package_settings(PackageSettings {
///         product_name: "video-downloader".into(),
///         version: "1.0.0".into(),
///         ..Default::default()
///     })
///     .bundle_settings(BundleSettings {
///         entry_point: Some("src/main.rs".into()),
///         ..Default::default()
///     })
///     .platform(Platform::Linux)
///     .build()?;
///
/// assert_eq!(settings.executable_name(), "video-downloader");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Package metadata.
    pub(super) package: PackageSettings,

    /// Build descriptor.
    pub(super) bundle_settings: BundleSettings,

    /// Directory holding `Cargo.toml`; relative descriptor paths resolve here.
    pub(super) project_root: PathBuf,

    /// Absolute entry point.
    pub(super) entry_point: PathBuf,

    /// Binary compiled from the entry point.
    pub(super) binary: BundleBinary,

    /// Target platform of the distributable.
    pub(super) platform: Platform,

    /// Validated Info.plist values; present only for macOS targets.
    pub(super) bundle_metadata: Option<BundleMetadata>,

    pub(super) dist_dir: PathBuf,
    pub(super) work_dir: PathBuf,
    pub(super) release_dir: PathBuf,

    pub(super) onefile: bool,
    pub(super) console: bool,
    pub(super) compress: bool,

    /// Run `cargo build` before packaging.
    pub(super) compile: bool,

    /// Produce the release archive after the build.
    pub(super) release_archive: bool,
}

impl Settings {
    /// Returns the product name used for every output path.
    pub fn product_name(&self) -> &str {
        self.bundle_settings
            .name
            .as_deref()
            .unwrap_or(&self.package.product_name)
    }

    /// Returns the bundle version string.
    pub fn version_string(&self) -> &str {
        self.bundle_settings
            .version
            .as_deref()
            .unwrap_or(&self.package.version)
    }

    /// Returns the package description.
    pub fn description(&self) -> &str {
        &self.package.description
    }

    /// Returns the bundle identifier, if configured.
    pub fn identifier(&self) -> Option<&str> {
        self.bundle_settings.identifier.as_deref()
    }

    /// Returns the project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Returns the absolute entry point path.
    pub fn entry_point(&self) -> &Path {
        &self.entry_point
    }

    /// Returns the binary to package.
    pub fn binary(&self) -> &BundleBinary {
        &self.binary
    }

    /// Returns the full path to the compiled binary.
    ///
    /// Uses the prebuilt path when one was given, otherwise
    /// `target/release/<binary>` with the platform executable suffix.
    pub fn binary_path(&self) -> PathBuf {
        if let Some(path) = self.binary.src_path() {
            return self.resolve(path);
        }

        self.project_root.join("target").join("release").join(format!(
            "{}{}",
            self.binary.name(),
            self.platform.exe_suffix()
        ))
    }

    /// Returns the file name of the emitted executable.
    pub fn executable_name(&self) -> String {
        format!("{}{}", self.product_name(), self.platform.exe_suffix())
    }

    /// Returns the target platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns the build descriptor.
    pub fn bundle_settings(&self) -> &BundleSettings {
        &self.bundle_settings
    }

    /// Returns the macOS bundle metadata (only set for macOS targets).
    pub fn bundle_metadata(&self) -> Option<&BundleMetadata> {
        self.bundle_metadata.as_ref()
    }

    /// Returns the declared hidden imports.
    pub fn hidden_imports(&self) -> &[String] {
        &self.bundle_settings.hidden_imports
    }

    /// Returns the styling library whose themes are harvested.
    pub fn theme_library(&self) -> Option<&ThemeLibrary> {
        self.bundle_settings.theme_library.as_ref()
    }

    /// Returns the resource glob patterns.
    pub fn resource_patterns(&self) -> &[String] {
        self.bundle_settings.resources.as_deref().unwrap_or(&[])
    }

    /// Returns the extra binaries, resolved against the project root.
    pub fn extra_binaries(&self) -> Vec<PathBuf> {
        self.bundle_settings
            .binaries
            .iter()
            .flatten()
            .map(|path| self.resolve(path))
            .collect()
    }

    /// Returns the configured icon for the target platform.
    ///
    /// `.ico` for Windows, `.icns` for macOS, none for Linux. The path is
    /// not checked for existence here.
    pub fn icon_path(&self) -> Option<PathBuf> {
        let configured = match self.platform {
            Platform::Windows => self.bundle_settings.output.icon_ico.as_ref(),
            Platform::MacOs => self.bundle_settings.macos.icon_icns.as_ref(),
            Platform::Linux => None,
        };
        configured.map(|path| self.resolve(path))
    }

    /// Single executable (true) or folder output.
    pub fn onefile(&self) -> bool {
        self.onefile
    }

    /// Whether a console window stays attached on Windows.
    pub fn console(&self) -> bool {
        self.console
    }

    /// Returns the PE subsystem matching the console flag.
    pub fn subsystem(&self) -> Subsystem {
        Subsystem::from_console_flag(self.console)
    }

    /// Whether the resource archive is compressed.
    pub fn compress(&self) -> bool {
        self.compress
    }

    /// Whether `cargo build` runs before packaging.
    pub fn compile(&self) -> bool {
        self.compile
    }

    /// Whether a release archive is produced.
    pub fn release_archive(&self) -> bool {
        self.release_archive
    }

    /// Final output directory.
    pub fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }

    /// Intermediate artifact directory.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Release archive directory.
    pub fn release_dir(&self) -> &Path {
        &self.release_dir
    }

    /// Returns the package homepage URL.
    pub fn homepage(&self) -> Option<&str> {
        self.package.homepage.as_deref()
    }

    /// Returns the package authors.
    pub fn authors(&self) -> Option<&[String]> {
        self.package.authors.as_deref()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}
