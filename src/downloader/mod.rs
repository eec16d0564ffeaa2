//! Video downloading.
//!
//! URLs on supported video sites are handed to yt-dlp; anything else is
//! fetched directly over HTTP. Both paths report progress through a callback
//! and return the path of the saved file.
//!
//! ```no_run
//! use video_downloader::downloader::VideoDownloader;
//!
//! # fn example() -> video_downloader::downloader::Result<()> {
//! let downloader = VideoDownloader::new("downloads")?;
//! let path = downloader.download("https://youtu.be/dQw4w9WgXcQ", |update| {
//!     println!("{}", update.status());
//! })?;
//! println!("saved to {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod deps;
pub mod direct;
mod error;
pub mod filename;
pub mod progress;
pub mod url;
pub mod ytdlp;

pub use deps::ToolStatus;
pub use error::{DownloadError, Result};
pub use progress::{Progress, ProgressUpdate};
pub use self::url::Route;
pub use ytdlp::{DownloadPlan, FormatChoice, FormatRow, VideoFormat, VideoInfo, YtDlp};

use std::path::{Path, PathBuf};

/// Directory the GUI saves into: `~/Downloads/VideoDownloader`.
pub fn default_download_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("Downloads").join("VideoDownloader"))
}

/// Downloads videos into a fixed directory.
#[derive(Clone, Debug)]
pub struct VideoDownloader {
    download_dir: PathBuf,
    tools: ToolStatus,
}

impl VideoDownloader {
    /// Creates the download directory if needed and checks for yt-dlp and
    /// ffmpeg.
    pub fn new(download_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_tools(download_dir, ToolStatus::detect())
    }

    pub fn with_tools(download_dir: impl Into<PathBuf>, tools: ToolStatus) -> Result<Self> {
        let download_dir = download_dir.into();
        std::fs::create_dir_all(&download_dir)
            .map_err(DownloadError::io("creating download directory", &download_dir))?;
        Ok(Self {
            download_dir,
            tools,
        })
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn tools(&self) -> &ToolStatus {
        &self.tools
    }

    fn ytdlp(&self) -> Result<YtDlp> {
        self.tools
            .ytdlp()
            .map(YtDlp::new)
            .ok_or(DownloadError::YtDlpMissing)
    }

    pub fn fetch_info(&self, url: &str) -> Result<VideoInfo> {
        let url = url::validate(url)?;
        self.ytdlp()?.fetch_info(url.as_str())
    }

    /// Downloads `url` at the best available quality.
    pub fn download(
        &self,
        url: &str,
        mut on_progress: impl FnMut(&ProgressUpdate),
    ) -> Result<PathBuf> {
        let url = url::validate(url)?;
        match url::route(&url) {
            Route::YtDlp => {
                let plan = DownloadPlan::new(&FormatChoice::Best, self.tools.has_ffmpeg())?;
                self.ytdlp()?
                    .download(url.as_str(), &plan, &self.download_dir, &mut on_progress)
            }
            Route::Direct => direct::download(&url, &self.download_dir, &mut on_progress),
        }
    }

    /// Downloads a specific format through yt-dlp.
    pub fn download_format(
        &self,
        url: &str,
        choice: &FormatChoice,
        mut on_progress: impl FnMut(&ProgressUpdate),
    ) -> Result<PathBuf> {
        let url = url::validate(url)?;
        let plan = DownloadPlan::new(choice, self.tools.has_ffmpeg())?;
        self.ytdlp()?
            .download(url.as_str(), &plan, &self.download_dir, &mut on_progress)
    }

    pub fn update_ytdlp(&self) -> Result<String> {
        self.ytdlp()?.update()
    }
}
