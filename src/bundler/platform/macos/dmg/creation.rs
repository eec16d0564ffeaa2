//! Core DMG creation logic using hdiutil.

use crate::bundler::{
    Error,
    builder::tool_detection::HDIUTIL,
    error::{Context, ErrorExt, Result},
    settings::Settings,
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Create DMG from .app bundle using hdiutil
///
/// # DMG Creation Steps
/// 1. Create temporary staging directory using tempfile crate
/// 2. Copy .app bundle to staging directory
/// 3. Create Applications symlink: `staging/Applications -> /Applications`
/// 4. Run hdiutil create with UDZO format
/// 5. Automatic cleanup (tempfile handles it)
///
/// # DMG Naming Convention
/// Format: `{ProductName}-macOS.dmg`
pub async fn create_dmg(
    settings: &Settings,
    app_bundle: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let dmg_name = format!(
        "{}-{}.dmg",
        settings.product_name(),
        settings.platform().release_label()
    );
    let dmg_path = output_dir.join(&dmg_name);
    let hdiutil = HDIUTIL
        .as_ref()
        .context("hdiutil not found; disk images can only be created on macOS")?;
    fs::remove_path(&dmg_path).await?;

    let temp_dir = tempfile::tempdir().map_err(|e| {
        Error::GenericError(format!(
            "Failed to create temporary directory for DMG contents: {}",
            e
        ))
    })?;
    let staging_path = temp_dir.path();

    let app_name = app_bundle
        .file_name()
        .ok_or_else(|| Error::GenericError("Invalid app bundle path".into()))?;
    let staged_app = staging_path.join(app_name);

    log::debug!("Copying .app to staging: {}", staged_app.display());
    fs::copy_dir(app_bundle, &staged_app)
        .await
        .with_context(|| {
            format!(
                "copying .app bundle to staging directory: {}",
                staged_app.display()
            )
        })?;

    #[cfg(unix)]
    {
        let applications_link = staging_path.join("Applications");
        std::os::unix::fs::symlink("/Applications", &applications_link)
            .fs_context("creating Applications symlink", &applications_link)?;
    }

    let output = tokio::process::Command::new(hdiutil)
        .arg("create")
        .arg("-volname")
        .arg(settings.product_name())
        .arg("-srcfolder")
        .arg(staging_path)
        .arg("-ov")
        .args(["-format", "UDZO"])
        .arg(&dmg_path)
        .output()
        .await
        .map_err(|e| Error::GenericError(format!("Failed to execute hdiutil command: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::build_failure(format!("hdiutil failed: {}", stderr.trim())));
    }

    log::info!("✓ Created DMG: {}", dmg_path.display());

    drop(temp_dir);

    Ok(dmg_path)
}
