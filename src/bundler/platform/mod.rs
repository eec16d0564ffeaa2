//! Platform targets and per-platform output steps.
//!
//! [`Platform`] decides the executable suffix, which icon format is picked,
//! whether the `.app` wrapping step runs and which release archive is made.

pub mod linux;
pub mod macos;
pub mod windows;

use std::{fmt, path::PathBuf, str::FromStr};

/// Target platform of a build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Returns the platform the packager is running on.
    ///
    /// Unknown hosts are treated as Linux.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    /// Executable file suffix (`.exe` on Windows, empty elsewhere).
    pub fn exe_suffix(self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            Self::MacOs | Self::Linux => "",
        }
    }

    /// Name used in release archive file names.
    pub fn release_label(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
        }
    }

    /// Whether the binary gets wrapped in a `.app` bundle.
    pub fn wraps_bundle(self) -> bool {
        matches!(self, Self::MacOs)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
        })
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win" => Ok(Self::Windows),
            "macos" | "mac" | "darwin" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            other => Err(format!(
                "unknown platform `{other}` (expected windows, macos or linux)"
            )),
        }
    }
}

/// Kind of artifact produced by a build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageType {
    /// Single executable with the resource archive appended.
    Executable,
    /// Folder holding the executable, data files and manifest.
    Folder,
    /// macOS `.app` directory.
    AppBundle,
    /// Windows release zip.
    Zip,
    /// macOS disk image.
    Dmg,
    /// Linux release tarball.
    TarGz,
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Executable => "executable",
            Self::Folder => "folder",
            Self::AppBundle => "app bundle",
            Self::Zip => "zip",
            Self::Dmg => "dmg",
            Self::TarGz => "tar.gz",
        })
    }
}

/// A finished artifact with its size and checksum.
#[derive(Clone, Debug)]
pub struct BundledArtifact {
    /// What kind of artifact this is.
    pub package_type: PackageType,
    /// Paths making up the artifact (the first one is checksummed).
    pub paths: Vec<PathBuf>,
    /// Total size in bytes (directory trees summed).
    pub size: u64,
    /// Hex SHA-256 of the first path.
    pub checksum: String,
}
