use std::path::PathBuf;
use thiserror::Error;

/// Result alias for download operations.
pub type Result<T> = std::result::Result<T, DownloadError>;

/// Errors raised while fetching metadata or downloading a video.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("yt-dlp is not installed or not on PATH")]
    YtDlpMissing,

    /// The selected format carries no audio and merging it requires ffmpeg.
    #[error("format {format_id} is video-only and needs ffmpeg to add audio, which is not installed")]
    FfmpegRequired { format_id: String },

    #[error("{0}")]
    YtDlp(String),

    #[error("unreadable yt-dlp metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{context} {path}: {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    pub(crate) fn io(
        context: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            context,
            path,
            source,
        }
    }

    /// User-facing advice for rate limiting and geo-blocking failures.
    pub fn hint(&self) -> Option<&'static str> {
        let message = self.to_string();
        if message.contains("429") {
            Some("Too many requests. Please try again later.")
        } else if message.contains("403") {
            Some("Access forbidden. This might be due to regional restrictions.")
        } else {
            None
        }
    }
}
