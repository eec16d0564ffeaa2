//! macOS platform-specific settings.

use regex::Regex;
use std::sync::LazyLock;

static DOTTED_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("version pattern is valid"));

static REVERSE_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").expect("identifier pattern is valid")
});

/// Returns true for dotted numeric versions such as `1.0.0` or `10.15`.
pub fn is_dotted_version(version: &str) -> bool {
    DOTTED_VERSION.is_match(version)
}

/// Returns true for reverse-domain identifiers such as `com.example.app`.
pub fn is_reverse_domain(identifier: &str) -> bool {
    REVERSE_DOMAIN.is_match(identifier)
}

/// macOS application bundle (.app) configuration.
///
/// # Configuration
///
/// Flattened into `[package.metadata.bundle]`:
///
/// ```toml
/// [package.metadata.bundle]
/// build_version = "1.0.0"
/// minimum_system_version = "10.15"
/// icon_icns = "icon.icns"
/// ```
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct MacOsSettings {
    /// CFBundleVersion. Defaults to the bundle version.
    #[serde(default)]
    pub build_version: Option<String>,

    /// Minimum macOS version required (LSMinimumSystemVersion).
    ///
    /// Example: "10.15", "11.0"
    #[serde(default)]
    pub minimum_system_version: Option<String>,

    /// NSHighResolutionCapable.
    ///
    /// Default: true
    #[serde(default)]
    pub high_resolution_capable: Option<bool>,

    /// Pre-made ICNS file for the bundle icon.
    #[serde(default)]
    pub icon_icns: Option<std::path::PathBuf>,
}

/// Validated Info.plist metadata attached to a macOS bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleMetadata {
    /// Reverse-domain bundle identifier (CFBundleIdentifier).
    pub identifier: String,
    /// CFBundleShortVersionString.
    pub version: String,
    /// CFBundleVersion.
    pub build_version: String,
    /// LSMinimumSystemVersion.
    pub minimum_system_version: Option<String>,
    /// NSHighResolutionCapable.
    pub high_resolution_capable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_versions() {
        assert!(is_dotted_version("1.0.0"));
        assert!(is_dotted_version("10.15"));
        assert!(is_dotted_version("2"));
        assert!(!is_dotted_version("1.0.0-beta"));
        assert!(!is_dotted_version("1..0"));
        assert!(!is_dotted_version(""));
        assert!(!is_dotted_version("v1.0"));
    }

    #[test]
    fn reverse_domain_identifiers() {
        assert!(is_reverse_domain("com.tolstoyj.videodownloader"));
        assert!(!is_reverse_domain("videodownloader"));
        assert!(!is_reverse_domain("com..app"));
        assert!(!is_reverse_domain("com.video downloader"));
    }
}
