//! Analysis step: entry point, compiled binary and icon checks.

use super::{BuildWarning, tool_detection::CARGO};
use crate::bundler::{
    Error, Result,
    error::{Context, ErrorExt},
    platform::Platform,
    settings::Settings,
};
use std::{io, path::PathBuf};

/// Fails unless the entry point exists as a regular file.
///
/// Runs before any output or work directory is created.
pub async fn verify_entry_point(settings: &Settings) -> Result<()> {
    let entry = settings.entry_point();
    match tokio::fs::metadata(entry).await {
        Ok(metadata) if metadata.is_file() => {
            log::debug!("Entry point: {}", entry.display());
            Ok(())
        }
        Ok(_) => Err(Error::build_failure(format!(
            "entry point {} is not a file",
            entry.display()
        ))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::build_failure(format!(
            "entry point {} does not exist",
            entry.display()
        ))),
        Err(e) => Err(e).fs_context("reading entry point", entry),
    }
}

/// Runs `cargo build --release --bin <binary>`.
pub async fn compile(settings: &Settings) -> Result<()> {
    if settings.platform() != Platform::current() {
        return Err(Error::build_failure(format!(
            "cannot compile for {} on a {} host; pass a prebuilt binary with --binary",
            settings.platform(),
            Platform::current()
        )));
    }

    let cargo = CARGO
        .as_ref()
        .context("cargo not found in PATH; pass a prebuilt binary with --binary")?;
    let manifest = settings.project_root().join("Cargo.toml");

    log::info!("Compiling {} (release)...", settings.binary().name());
    let status = tokio::process::Command::new(cargo)
        .args(["build", "--release", "--bin", settings.binary().name()])
        .arg("--manifest-path")
        .arg(&manifest)
        .status()
        .await
        .context("running cargo build")?;

    if !status.success() {
        return Err(Error::build_failure(format!(
            "cargo build for `{}` exited with {}",
            settings.binary().name(),
            status
        )));
    }
    Ok(())
}

/// Returns the compiled binary path, failing if it does not exist.
pub async fn verify_binary(settings: &Settings) -> Result<PathBuf> {
    let binary = settings.binary_path();
    match tokio::fs::metadata(&binary).await {
        Ok(metadata) if metadata.is_file() => Ok(binary),
        _ => Err(Error::build_failure(format!(
            "compiled binary {} does not exist",
            binary.display()
        ))),
    }
}

/// Picks the platform icon; a configured but absent icon becomes a warning.
pub async fn resolve_icon(settings: &Settings, warnings: &mut Vec<BuildWarning>) -> Option<PathBuf> {
    let icon = settings.icon_path()?;
    if tokio::fs::metadata(&icon).await.is_ok_and(|m| m.is_file()) {
        return Some(icon);
    }

    let warning = BuildWarning::MissingIcon { path: icon };
    log::warn!("{}", warning);
    warnings.push(warning);
    None
}
