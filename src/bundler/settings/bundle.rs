//! Build descriptor and binary definitions.

use super::{MacOsSettings, OutputSettings};
use crate::bundler::harvest::ThemeLibrary;
use std::path::PathBuf;

/// Build descriptor.
///
/// Declarative description of what goes into the distributable: the entry
/// point, the hidden-import list, extra data files and per-platform output
/// shaping.
///
/// # Configuration
///
/// Add to `Cargo.toml`:
///
/// ```toml
/// [package.metadata.bundle]
/// name = "VideoDownloader"
/// entry_point = "src/bin/video-downloader.rs"
/// binary = "video-downloader"
/// identifier = "com.tolstoyj.videodownloader"
/// version = "1.0.0"
/// hidden_imports = ["eframe.glow", "rfd.dialog"]
/// resources = ["assets/**/*.png"]
///
/// [package.metadata.bundle.theme_library]
/// name = "qt_material"
/// subdir = "themes"
/// suffix = ".xml"
/// ```
///
/// # See Also
///
/// - [`MacOsSettings`] - Info.plist values
/// - [`OutputSettings`] - onefile / console / compress flags
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct BundleSettings {
    /// Product name used for every output path.
    ///
    /// Default: the package name
    #[serde(default)]
    pub name: Option<String>,

    /// Application entry point, relative to the project root.
    ///
    /// Required. Must exist when the build starts.
    #[serde(default)]
    pub entry_point: Option<PathBuf>,

    /// Cargo binary target compiled from the entry point.
    ///
    /// Default: the package name
    #[serde(default)]
    pub binary: Option<String>,

    /// Bundle identifier in reverse domain notation.
    ///
    /// Example: "com.tolstoyj.videodownloader"
    ///
    /// Required for macOS bundles.
    #[serde(default)]
    pub identifier: Option<String>,

    /// CFBundleShortVersionString and manifest version.
    ///
    /// Default: the package version
    #[serde(default)]
    pub version: Option<String>,

    /// GUI runtime modules the packaged binary must resolve at startup.
    ///
    /// Not checked at build time.
    #[serde(default)]
    pub hidden_imports: Vec<String>,

    /// Resource glob patterns to bundle, relative to the project root.
    ///
    /// Example: `["assets/**/*"]`
    #[serde(default)]
    pub resources: Option<Vec<String>>,

    /// Extra binaries copied next to the application.
    #[serde(default)]
    pub binaries: Option<Vec<PathBuf>>,

    /// Styling library whose theme files get harvested.
    #[serde(default)]
    pub theme_library: Option<ThemeLibrary>,

    /// macOS bundle values.
    #[serde(flatten)]
    pub macos: MacOsSettings,

    /// Output shape.
    #[serde(flatten)]
    pub output: OutputSettings,
}

/// The application binary to package.
///
/// # Examples
///
/// ```no_run
/// use video_downloader::bundler::BundleBinary;
///
/// let gui = BundleBinary::new("video-downloader".into());
/// let prebuilt = BundleBinary::with_path("video-downloader".into(), Some("out/vd".into()));
/// ```
#[derive(Clone, Debug)]
pub struct BundleBinary {
    name: String,
    src_path: Option<PathBuf>,
}

impl BundleBinary {
    /// Creates a binary resolved from `target/release`.
    pub fn new(name: String) -> Self {
        Self {
            name,
            src_path: None,
        }
    }

    /// Creates a binary with an explicit, prebuilt location.
    pub fn with_path(name: String, src_path: Option<PathBuf>) -> Self {
        Self { name, src_path }
    }

    /// Returns the Cargo binary target name (without extension).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the prebuilt binary path if set.
    pub fn src_path(&self) -> Option<&PathBuf> {
        self.src_path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_deserializes_flattened_sections() {
        let descriptor: BundleSettings = toml::from_str(
            r#"
            name = "VideoDownloader"
            entry_point = "src/bin/video-downloader.rs"
            identifier = "com.tolstoyj.videodownloader"
            minimum_system_version = "10.15"
            onefile = false
            console = true
            icon_ico = "icon.ico"
            hidden_imports = ["eframe.glow"]

            [theme_library]
            name = "qt_material"
            "#,
        )
        .unwrap();

        assert_eq!(descriptor.name.as_deref(), Some("VideoDownloader"));
        assert_eq!(descriptor.macos.minimum_system_version.as_deref(), Some("10.15"));
        assert_eq!(descriptor.output.onefile, Some(false));
        assert_eq!(descriptor.output.console, Some(true));
        assert_eq!(descriptor.output.compress, None);
        assert_eq!(descriptor.output.icon_ico, Some(PathBuf::from("icon.ico")));
        assert_eq!(descriptor.hidden_imports, vec!["eframe.glow".to_string()]);

        let library = descriptor.theme_library.unwrap();
        assert_eq!(library.name, "qt_material");
        assert_eq!(library.suffix, ".xml");
    }
}
