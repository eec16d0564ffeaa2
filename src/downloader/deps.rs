//! External tool discovery.

use std::path::{Path, PathBuf};

pub const YTDLP: &str = "yt-dlp";
pub const FFMPEG: &str = "ffmpeg";

/// Which external tools are installed.
///
/// yt-dlp is needed for every site-extracted download; ffmpeg only for
/// merging separate video and audio streams and for remuxing to mp4.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolStatus {
    pub ytdlp: Option<PathBuf>,
    pub ffmpeg: Option<PathBuf>,
}

impl ToolStatus {
    /// Looks both tools up on `PATH`.
    pub fn detect() -> Self {
        let status = Self {
            ytdlp: which::which(YTDLP).ok(),
            ffmpeg: which::which(FFMPEG).ok(),
        };
        match &status.ffmpeg {
            Some(path) => log::debug!("ffmpeg found at {}", path.display()),
            None => log::warn!("ffmpeg not found, formats that need merging are unavailable"),
        }
        if status.ytdlp.is_none() {
            log::warn!("yt-dlp not found on PATH");
        }
        status
    }

    pub fn ytdlp(&self) -> Option<&Path> {
        self.ytdlp.as_deref()
    }

    pub fn has_ffmpeg(&self) -> bool {
        self.ffmpeg.is_some()
    }
}
