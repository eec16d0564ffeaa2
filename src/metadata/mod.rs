//! Build descriptor loading from a single Cargo.toml

use crate::bundler::{BundleSettings, PackageSettings};
use crate::error::{BundlerError, CliError, Result};
use std::path::{Path, PathBuf};

/// Complete manifest data from Cargo.toml
#[derive(Debug, Clone)]
pub struct CargoManifest {
    /// Package metadata ([package] section)
    pub package: PackageSettings,

    /// SPDX license identifier
    pub license: Option<String>,

    /// Build descriptor ([package.metadata.bundle] section)
    pub bundle_settings: BundleSettings,

    /// Directory containing the manifest
    pub project_root: PathBuf,
}

/// Load the package metadata and build descriptor from Cargo.toml
///
/// The file is read and parsed once. When the descriptor does not name the
/// binary, the `[[bin]]` target whose `path` is the entry point is used,
/// falling back to the package name.
pub fn load_manifest(cargo_toml_path: &Path) -> Result<CargoManifest> {
    let manifest = std::fs::read_to_string(cargo_toml_path).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_cargo_toml".to_string(),
            reason: format!("Failed to read {}: {}", cargo_toml_path.display(), e),
        })
    })?;

    let toml_value: toml::Value = toml::from_str(&manifest).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "parse_cargo_toml".to_string(),
            reason: format!("Failed to parse {}: {}", cargo_toml_path.display(), e),
        })
    })?;

    let package_table = toml_value.get("package").ok_or_else(|| {
        BundlerError::Cli(CliError::InvalidArguments {
            reason: "No [package] section in Cargo.toml".to_string(),
        })
    })?;

    let package = parse_package(package_table)?;
    let license = package_table
        .get("license")
        .and_then(|v| v.as_str())
        .map(String::from);

    let mut bundle_settings = parse_bundle_settings(&toml_value)?;
    if bundle_settings.binary.is_none() {
        bundle_settings.binary = discover_binary(&toml_value, &bundle_settings);
    }

    let project_root = match cargo_toml_path.parent() {
        Some(dir) if dir.as_os_str().is_empty() => PathBuf::from("."),
        Some(dir) => dir.to_path_buf(),
        None => {
            return Err(BundlerError::Cli(CliError::InvalidArguments {
                reason: "Invalid Cargo.toml path".to_string(),
            }));
        }
    };

    Ok(CargoManifest {
        package,
        license,
        bundle_settings,
        project_root,
    })
}

fn parse_package(package: &toml::Value) -> Result<PackageSettings> {
    let required = |key: &str| {
        package
            .get(key)
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| {
                BundlerError::Cli(CliError::InvalidArguments {
                    reason: format!("Missing '{key}' in [package]"),
                })
            })
    };

    Ok(PackageSettings {
        product_name: required("name")?,
        version: required("version")?,
        description: package
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("Rust application")
            .to_string(),
        homepage: package
            .get("homepage")
            .and_then(|v| v.as_str())
            .map(String::from),
        authors: package.get("authors").and_then(|v| v.as_array()).map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        }),
    })
}

/// Parse the build descriptor from [package.metadata.bundle]
///
/// A manifest without the section yields an empty descriptor; the settings
/// builder then reports the missing entry point.
fn parse_bundle_settings(toml_value: &toml::Value) -> Result<BundleSettings> {
    match toml_value
        .get("package")
        .and_then(|p| p.get("metadata"))
        .and_then(|m| m.get("bundle"))
    {
        Some(bundle) => Ok(bundle.clone().try_into()?),
        None => {
            log::warn!("No [package.metadata.bundle] section in Cargo.toml");
            Ok(BundleSettings::default())
        }
    }
}

/// The `[[bin]]` target compiled from the descriptor's entry point.
fn discover_binary(toml_value: &toml::Value, settings: &BundleSettings) -> Option<String> {
    let entry_point = settings.entry_point.as_deref()?;
    toml_value
        .get("bin")
        .and_then(|v| v.as_array())?
        .iter()
        .find(|bin| {
            bin.get("path")
                .and_then(|p| p.as_str())
                .is_some_and(|p| Path::new(p) == entry_point)
        })
        .and_then(|bin| bin.get("name"))
        .and_then(|v| v.as_str())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[package]
name = "video-downloader"
version = "1.0.0"
license = "MIT"
authors = ["tolstoyj"]

[[bin]]
name = "videodownloader-bundle"
path = "src/main.rs"

[[bin]]
name = "video-downloader"
path = "src/bin/video-downloader.rs"

[package.metadata.bundle]
name = "VideoDownloader"
entry_point = "src/bin/video-downloader.rs"
identifier = "com.tolstoyj.videodownloader"
onefile = false
hidden_imports = ["eframe.glow"]

[package.metadata.bundle.theme_library]
name = "qt_material"
"#;

    #[test]
    fn loads_package_and_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        std::fs::write(&path, MANIFEST).unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.package.product_name, "video-downloader");
        assert_eq!(manifest.package.version, "1.0.0");
        assert_eq!(manifest.license.as_deref(), Some("MIT"));
        assert_eq!(manifest.project_root, dir.path());

        let bundle = &manifest.bundle_settings;
        assert_eq!(bundle.name.as_deref(), Some("VideoDownloader"));
        assert_eq!(bundle.binary.as_deref(), Some("video-downloader"));
        assert_eq!(bundle.output.onefile, Some(false));
        assert_eq!(bundle.hidden_imports, vec!["eframe.glow".to_string()]);
        let library = bundle.theme_library.as_ref().unwrap();
        assert_eq!(library.subdir, PathBuf::from(qt_material::THEME_DIR));
    }

    #[test]
    fn missing_version_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        std::fs::write(&path, "[package]\nname = \"x\"\n").unwrap();

        let err = load_manifest(&path).unwrap_err();
        assert!(err.to_string().contains("Missing 'version'"));
    }

    #[test]
    fn unreadable_manifest_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_manifest(&dir.path().join("Cargo.toml")).is_err());
    }
}
