//! Builder for constructing Settings.

use super::{
    BundleBinary, BundleMetadata, BundleSettings, PackageSettings, Settings, is_dotted_version,
    is_reverse_domain,
};
use crate::bundler::{Error, Result, error::Context, platform::Platform};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Provides a fluent API for building bundler settings with validation.
/// Command-line overrides (`--onedir`, `--console`, `--platform`, ...) are
/// applied here on top of the descriptor values.
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
///         entry_point: Some("src/bin/video-downloader.rs".into()),
///         identifier: Some("com.tolstoyj.videodownloader".into()),
///         ..Default::default()
///     })
///     .platform(Platform::MacOs)
///     .onefile(false)
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`Settings`] - The built settings struct
#[derive(Default)]
pub struct SettingsBuilder {
    project_root: Option<PathBuf>,
    package_settings: Option<PackageSettings>,
    bundle_settings: BundleSettings,
    platform: Option<Platform>,
    binary_path: Option<PathBuf>,
    dist_dir: Option<PathBuf>,
    work_dir: Option<PathBuf>,
    release_dir: Option<PathBuf>,
    onefile: Option<bool>,
    console: Option<bool>,
    compress: Option<bool>,
    compile: Option<bool>,
    release_archive: bool,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project root (the directory holding `Cargo.toml`).
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets package metadata.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets the build descriptor.
    ///
    /// Default: Empty [`BundleSettings`]
    pub fn bundle_settings(mut self, settings: BundleSettings) -> Self {
        self.bundle_settings = settings;
        self
    }

    /// Sets the target platform.
    ///
    /// Default: the host platform
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Uses a prebuilt binary instead of `target/release/<binary>`.
    pub fn binary_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.binary_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory.
    ///
    /// Default: `<project_root>/dist`
    pub fn dist_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dist_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the intermediate artifact directory.
    ///
    /// Default: `<project_root>/build`
    pub fn work_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.work_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the release archive directory.
    ///
    /// Default: `<project_root>/release`
    pub fn release_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.release_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the descriptor's `onefile` flag.
    pub fn onefile(mut self, onefile: bool) -> Self {
        self.onefile = Some(onefile);
        self
    }

    /// Overrides the descriptor's `console` flag.
    pub fn console(mut self, console: bool) -> Self {
        self.console = Some(console);
        self
    }

    /// Overrides the descriptor's `compress` flag.
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = Some(compress);
        self
    }

    /// Controls whether `cargo build` runs before packaging.
    ///
    /// Default: true, unless a prebuilt binary path is set
    pub fn compile(mut self, compile: bool) -> Self {
        self.compile = Some(compile);
        self
    }

    /// Requests a release archive after the build.
    ///
    /// Default: false
    pub fn release_archive(mut self, release_archive: bool) -> Self {
        self.release_archive = release_archive;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// - a required field (`project_root`, `package_settings`, the
    ///   descriptor's `entry_point`) is missing
    /// - a version string is not dotted numeric ([`Error::InvalidVersion`])
    /// - a macOS target has no reverse-domain identifier
    ///   ([`Error::InvalidIdentifier`])
    pub fn build(self) -> Result<Settings> {
        let project_root = self.project_root.context("project_root is required")?;
        let package = self
            .package_settings
            .context("package_settings is required")?;
        let bundle_settings = self.bundle_settings;

        let entry_point = bundle_settings
            .entry_point
            .as_ref()
            .map(|path| {
                if path.is_absolute() {
                    path.clone()
                } else {
                    project_root.join(path)
                }
            })
            .context("entry_point is required in [package.metadata.bundle]")?;

        let version = bundle_settings
            .version
            .clone()
            .unwrap_or_else(|| package.version.clone());
        check_version(&version)?;
        if let Some(build_version) = &bundle_settings.macos.build_version {
            check_version(build_version)?;
        }
        if let Some(minimum) = &bundle_settings.macos.minimum_system_version {
            check_version(minimum)?;
        }

        let platform = self.platform.unwrap_or_else(Platform::current);
        let bundle_metadata = match platform {
            Platform::MacOs => Some(macos_metadata(&bundle_settings, &version)?),
            Platform::Windows | Platform::Linux => None,
        };

        let binary_name = bundle_settings
            .binary
            .clone()
            .unwrap_or_else(|| package.product_name.clone());
        let compile = self.compile.unwrap_or(self.binary_path.is_none());
        let binary = BundleBinary::with_path(binary_name, self.binary_path);

        let output = &bundle_settings.output;
        let onefile = self.onefile.or(output.onefile).unwrap_or(true);
        let console = self.console.or(output.console).unwrap_or(false);
        let compress = self.compress.or(output.compress).unwrap_or(true);

        Ok(Settings {
            dist_dir: self.dist_dir.unwrap_or_else(|| project_root.join("dist")),
            work_dir: self.work_dir.unwrap_or_else(|| project_root.join("build")),
            release_dir: self
                .release_dir
                .unwrap_or_else(|| project_root.join("release")),
            package,
            bundle_settings,
            project_root,
            entry_point,
            binary,
            platform,
            bundle_metadata,
            onefile,
            console,
            compress,
            compile,
            release_archive: self.release_archive,
        })
    }
}

fn check_version(version: &str) -> Result<()> {
    if is_dotted_version(version) {
        Ok(())
    } else {
        Err(Error::InvalidVersion(version.to_string()))
    }
}

fn macos_metadata(bundle: &BundleSettings, version: &str) -> Result<BundleMetadata> {
    let identifier = bundle.identifier.clone().unwrap_or_default();
    if !is_reverse_domain(&identifier) {
        return Err(Error::InvalidIdentifier(identifier));
    }

    Ok(BundleMetadata {
        identifier,
        version: version.to_string(),
        build_version: bundle
            .macos
            .build_version
            .clone()
            .unwrap_or_else(|| version.to_string()),
        minimum_system_version: bundle.macos.minimum_system_version.clone(),
        high_resolution_capable: bundle.macos.high_resolution_capable.unwrap_or(true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::MacOsSettings;

    fn package() -> PackageSettings {
        PackageSettings {
            product_name: "video-downloader".into(),
            version: "1.0.0".into(),
            ..Default::default()
        }
    }

    fn descriptor() -> BundleSettings {
        BundleSettings {
            name: Some("VideoDownloader".into()),
            entry_point: Some("src/bin/video-downloader.rs".into()),
            identifier: Some("com.tolstoyj.videodownloader".into()),
            macos: MacOsSettings {
                minimum_system_version: Some("10.15".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn macos_metadata_defaults_build_version_to_version() {
        let settings = SettingsBuilder::new()
            .project_root("/project")
            .package_settings(package())
            .bundle_settings(descriptor())
            .platform(Platform::MacOs)
            .build()
            .unwrap();

        let metadata = settings.bundle_metadata().unwrap();
        assert_eq!(metadata.identifier, "com.tolstoyj.videodownloader");
        assert_eq!(metadata.version, "1.0.0");
        assert_eq!(metadata.build_version, "1.0.0");
        assert_eq!(metadata.minimum_system_version.as_deref(), Some("10.15"));
        assert!(metadata.high_resolution_capable);
    }

    #[test]
    fn metadata_only_attached_for_macos() {
        for platform in [Platform::Windows, Platform::Linux] {
            let settings = SettingsBuilder::new()
                .project_root("/project")
                .package_settings(package())
                .bundle_settings(descriptor())
                .platform(platform)
                .build()
                .unwrap();
            assert!(settings.bundle_metadata().is_none());
        }
    }

    #[test]
    fn rejects_non_numeric_versions() {
        let mut bundle = descriptor();
        bundle.version = Some("1.0-beta".into());
        let err = SettingsBuilder::new()
            .project_root("/project")
            .package_settings(package())
            .bundle_settings(bundle)
            .platform(Platform::Linux)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidVersion(v) if v == "1.0-beta"));
    }

    #[test]
    fn macos_requires_identifier() {
        let mut bundle = descriptor();
        bundle.identifier = None;
        let err = SettingsBuilder::new()
            .project_root("/project")
            .package_settings(package())
            .bundle_settings(bundle)
            .platform(Platform::MacOs)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }

    #[test]
    fn requires_entry_point() {
        let mut bundle = descriptor();
        bundle.entry_point = None;
        assert!(
            SettingsBuilder::new()
                .project_root("/project")
                .package_settings(package())
                .bundle_settings(bundle)
                .build()
                .is_err()
        );
    }

    #[test]
    fn overrides_win_over_descriptor() {
        let mut bundle = descriptor();
        bundle.output.onefile = Some(true);
        bundle.output.console = Some(false);
        let settings = SettingsBuilder::new()
            .project_root("/project")
            .package_settings(package())
            .bundle_settings(bundle)
            .platform(Platform::Windows)
            .onefile(false)
            .console(true)
            .binary_path("/prebuilt/vd.exe")
            .build()
            .unwrap();

        assert!(!settings.onefile());
        assert!(settings.console());
        assert!(settings.compress());
        assert!(!settings.compile());
        assert_eq!(settings.executable_name(), "VideoDownloader.exe");
        assert_eq!(settings.binary_path(), PathBuf::from("/prebuilt/vd.exe"));
        assert_eq!(settings.dist_dir(), Path::new("/project/dist"));
    }

    #[test]
    fn icon_selected_per_platform() {
        let mut bundle = descriptor();
        bundle.output.icon_ico = Some("icon.ico".into());
        bundle.macos.icon_icns = Some("icon.icns".into());

        let build = |platform| {
            SettingsBuilder::new()
                .project_root("/project")
                .package_settings(package())
                .bundle_settings(bundle.clone())
                .platform(platform)
                .build()
                .unwrap()
                .icon_path()
        };

        assert_eq!(build(Platform::Windows), Some(PathBuf::from("/project/icon.ico")));
        assert_eq!(build(Platform::MacOs), Some(PathBuf::from("/project/icon.icns")));
        assert_eq!(build(Platform::Linux), None);
    }
}
