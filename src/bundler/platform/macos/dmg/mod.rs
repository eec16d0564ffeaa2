//! macOS DMG disk image creator.
//!
//! Creates a drag-to-install DMG with the native hdiutil tool. The image
//! holds the `.app` bundle and an Applications symlink.

mod creation;

use crate::bundler::{
    Error, Result, builder::tool_detection::HDIUTIL, error::ErrorExt, settings::Settings,
};
use std::path::{Path, PathBuf};

pub use creation::create_dmg;

/// Builds `release/<Name>-macOS.dmg` from the `.app` bundle.
///
/// # Process
/// 1. Check that hdiutil is available
/// 2. Stage the .app next to an Applications symlink
/// 3. Generate the DMG with UDZO compression
pub async fn bundle_project(settings: &Settings, app_bundle: &Path) -> Result<PathBuf> {
    log::info!("Creating DMG for {}", settings.product_name());

    if HDIUTIL.is_none() {
        return Err(Error::build_failure(
            "hdiutil not found; disk images can only be created on macOS",
        ));
    }

    tokio::fs::create_dir_all(settings.release_dir())
        .await
        .fs_context("creating release directory", settings.release_dir())?;
    create_dmg(settings, app_bundle, settings.release_dir()).await
}
