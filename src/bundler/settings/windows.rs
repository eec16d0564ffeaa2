//! Output shaping settings (binary layout, console visibility, compression).

use std::path::PathBuf;

/// Shape of the emitted binary.
///
/// # Configuration
///
/// Flattened into `[package.metadata.bundle]`:
///
/// ```toml
/// [package.metadata.bundle]
/// onefile = true      # single executable with appended resources
/// console = false     # windowed application on Windows
/// compress = true     # gzip the resource archive
/// icon_ico = "icon.ico"
/// ```
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct OutputSettings {
    /// Single executable (true) or a folder with the binary and its data.
    ///
    /// Default: true
    #[serde(default)]
    pub onefile: Option<bool>,

    /// Keep a console window attached on Windows.
    ///
    /// Default: false
    #[serde(default)]
    pub console: Option<bool>,

    /// Compress the resource archive.
    ///
    /// Default: true
    #[serde(default)]
    pub compress: Option<bool>,

    /// Pre-made ICO file used for Windows builds.
    #[serde(default)]
    pub icon_ico: Option<PathBuf>,
}

/// Windows PE subsystem written into the optional header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subsystem {
    /// IMAGE_SUBSYSTEM_WINDOWS_GUI
    Windows,
    /// IMAGE_SUBSYSTEM_WINDOWS_CUI
    Console,
}

impl Subsystem {
    pub fn from_console_flag(console: bool) -> Self {
        if console { Self::Console } else { Self::Windows }
    }

    /// Raw value of the `Subsystem` header field.
    pub fn value(self) -> u16 {
        match self {
            Self::Windows => 2,
            Self::Console => 3,
        }
    }
}
