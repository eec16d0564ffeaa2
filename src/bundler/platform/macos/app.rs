//! macOS `.app` bundle wrapper.
//!
//! Produces:
//!
//! ```text
//! <dist>/<Name>.app/
//!   Contents/
//!     Info.plist
//!     PkgInfo
//!     MacOS/<Name>
//!     Resources/            icon, and for folder builds the data files
//! ```

use crate::{
    bundler::{
        Result,
        builder::{Emitted, copy_data_files},
        error::{Context, ErrorExt},
        harvest::DataFile,
        settings::{BundleMetadata, Settings},
        utils::fs,
    },
    runtime::MANIFEST_FILE,
};
use plist::{Dictionary, Value};
use std::path::{Path, PathBuf};

/// Wraps the emitted binary in `<dist>/<Name>.app`.
///
/// Folder builds additionally place their data files and manifest in
/// `Contents/Resources`, where the runtime looks for them.
pub async fn bundle_project(
    settings: &Settings,
    emitted: &Emitted,
    icon: Option<&Path>,
    data_files: &[DataFile],
    manifest: &Path,
) -> Result<PathBuf> {
    let metadata = settings
        .bundle_metadata()
        .context("bundle metadata is required for macOS bundles")?;

    let app_path = settings
        .dist_dir()
        .join(format!("{}.app", settings.product_name()));
    log::info!("Creating app bundle: {}", app_path.display());
    fs::create_dir_all(&app_path, true).await?;

    let contents = app_path.join("Contents");
    let macos_dir = contents.join("MacOS");
    let resources_dir = contents.join("Resources");
    fs::create_dir_all(&macos_dir, false).await?;
    fs::create_dir_all(&resources_dir, false).await?;

    let executable = macos_dir.join(settings.product_name());
    fs::copy_file(&emitted.executable, &executable).await?;
    fs::set_executable(&executable).await?;

    if !settings.onefile() {
        copy_data_files(data_files, &resources_dir).await?;
        fs::copy_file(manifest, &resources_dir.join(MANIFEST_FILE)).await?;
    }

    let icon_file = match icon {
        Some(icon) => {
            let name = icon
                .file_name()
                .and_then(|n| n.to_str())
                .context("invalid icon path")?
                .to_string();
            fs::copy_file(icon, &resources_dir.join(&name)).await?;
            Some(name)
        }
        None => None,
    };

    let plist_path = contents.join("Info.plist");
    let info = info_plist(settings.product_name(), metadata, icon_file.as_deref());
    Value::Dictionary(info).to_file_xml(&plist_path)?;

    let pkg_info = contents.join("PkgInfo");
    tokio::fs::write(&pkg_info, b"APPL????")
        .await
        .fs_context("writing PkgInfo", &pkg_info)?;

    log::info!("✓ Created app bundle: {}", app_path.display());
    Ok(app_path)
}

/// Builds the Info.plist dictionary.
pub fn info_plist(name: &str, metadata: &BundleMetadata, icon_file: Option<&str>) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.insert("CFBundleDevelopmentRegion".into(), "English".into());
    dict.insert("CFBundleDisplayName".into(), name.into());
    dict.insert("CFBundleExecutable".into(), name.into());
    dict.insert("CFBundleIdentifier".into(), metadata.identifier.as_str().into());
    dict.insert("CFBundleInfoDictionaryVersion".into(), "6.0".into());
    dict.insert("CFBundleName".into(), name.into());
    dict.insert("CFBundlePackageType".into(), "APPL".into());
    dict.insert(
        "CFBundleShortVersionString".into(),
        metadata.version.as_str().into(),
    );
    dict.insert("CFBundleVersion".into(), metadata.build_version.as_str().into());
    if let Some(minimum) = &metadata.minimum_system_version {
        dict.insert("LSMinimumSystemVersion".into(), minimum.as_str().into());
    }
    dict.insert(
        "NSHighResolutionCapable".into(),
        Value::Boolean(metadata.high_resolution_capable),
    );
    if let Some(icon) = icon_file {
        dict.insert("CFBundleIconFile".into(), icon.into());
    }
    dict
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> BundleMetadata {
        BundleMetadata {
            identifier: "com.tolstoyj.videodownloader".into(),
            version: "1.0.0".into(),
            build_version: "1.0.0".into(),
            minimum_system_version: Some("10.15".into()),
            high_resolution_capable: true,
        }
    }

    #[test]
    fn plist_carries_bundle_metadata() {
        let dict = info_plist("VideoDownloader", &metadata(), Some("icon.icns"));

        let string = |key: &str| dict.get(key).and_then(Value::as_string).map(str::to_string);
        assert_eq!(
            string("CFBundleIdentifier").as_deref(),
            Some("com.tolstoyj.videodownloader")
        );
        assert_eq!(string("CFBundleShortVersionString").as_deref(), Some("1.0.0"));
        assert_eq!(string("CFBundleVersion").as_deref(), Some("1.0.0"));
        assert_eq!(string("LSMinimumSystemVersion").as_deref(), Some("10.15"));
        assert_eq!(string("CFBundleExecutable").as_deref(), Some("VideoDownloader"));
        assert_eq!(string("CFBundleIconFile").as_deref(), Some("icon.icns"));
        assert_eq!(
            dict.get("NSHighResolutionCapable").and_then(Value::as_boolean),
            Some(true)
        );
    }

    #[test]
    fn plist_omits_icon_when_absent() {
        let dict = info_plist("VideoDownloader", &metadata(), None);
        assert!(dict.get("CFBundleIconFile").is_none());
    }
}
