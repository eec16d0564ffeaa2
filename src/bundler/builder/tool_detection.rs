//! External tool detection and availability checking.
//!
//! Lookups are cached so repeated builds in one process do not spawn the
//! same detection twice.

use std::{path::PathBuf, sync::LazyLock};

/// `cargo`, needed unless a prebuilt binary is supplied.
pub static CARGO: LazyLock<Option<PathBuf>> = LazyLock::new(|| detect("cargo", "--version"));

/// `hdiutil`, needed for the macOS disk image.
pub static HDIUTIL: LazyLock<Option<PathBuf>> = LazyLock::new(|| detect("hdiutil", "help"));

fn detect(tool: &str, version_arg: &str) -> Option<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());

            match std::process::Command::new(&path).arg(version_arg).output() {
                Ok(output) if output.status.success() => {
                    let version = String::from_utf8_lossy(&output.stdout);
                    let first_line = version.lines().next().unwrap_or_default();
                    log::debug!("✓ {} available: {}", tool, first_line.trim());
                    Some(path)
                }
                Ok(output) => {
                    log::warn!(
                        "{} found at {} but `{}` failed (exit code: {:?}). Stderr: {}",
                        tool,
                        path.display(),
                        version_arg,
                        output.status.code(),
                        String::from_utf8_lossy(&output.stderr)
                    );
                    None
                }
                Err(e) => {
                    log::warn!(
                        "{} found at {} but failed to execute: {}. Check file permissions.",
                        tool,
                        path.display(),
                        e
                    );
                    None
                }
            }
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            None
        }
    }
}
