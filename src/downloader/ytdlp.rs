//! yt-dlp integration: metadata, format selection, downloads and updates.

use super::{
    error::{DownloadError, Result},
    progress::{FILE_TEMPLATE, OutputLine, PROGRESS_TEMPLATE, ProgressUpdate, parse_line},
};
use serde::Deserialize;
use std::{
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
};

/// Preferred selector: mp4 video with m4a audio, merged by ffmpeg.
pub const DEFAULT_SELECTOR: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// Selector used when ffmpeg is missing; picks a single muxed file.
pub const FALLBACK_SELECTOR: &str = "best[ext=mp4]/best";

/// Output file name template inside the download directory.
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Parallel fragment downloads for segmented streams.
const CONCURRENT_FRAGMENTS: &str = "5";

/// Metadata printed by `yt-dlp -J`.
#[derive(Clone, Debug, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub formats: Vec<VideoFormat>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VideoFormat {
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
}

impl VideoFormat {
    fn has_video(&self) -> bool {
        self.vcodec.as_deref().is_some_and(|codec| codec != "none")
    }

    /// Video stream without audio; downloading it with sound needs a merge.
    pub fn is_video_only(&self) -> bool {
        self.acodec.as_deref() == Some("none")
    }
}

/// One row of the format table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatRow {
    pub quality: String,
    pub extension: String,
    pub size: String,
    pub format_id: String,
    pub video_only: bool,
}

impl FormatRow {
    /// Whether the format can be downloaded with the installed tools.
    pub fn is_available(&self, has_ffmpeg: bool) -> bool {
        has_ffmpeg || !self.video_only
    }
}

impl VideoInfo {
    pub fn parse(json: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(json)?)
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration.map(|d| d.max(0.0) as u64).unwrap_or(0)
    }

    pub fn channel(&self) -> &str {
        self.uploader.as_deref().unwrap_or("Unknown")
    }

    /// Title, duration and channel, one per line.
    pub fn summary(&self) -> String {
        format!(
            "Title: {}\nDuration: {} seconds\nChannel: {}",
            self.title,
            self.duration_secs(),
            self.channel()
        )
    }

    /// Formats that carry video and report a height.
    pub fn format_rows(&self) -> Vec<FormatRow> {
        self.formats
            .iter()
            .filter(|f| f.has_video())
            .filter_map(|f| {
                let height = f.height?;
                let mut quality = format!("{height}p");
                if let Some(fps) = f.fps.filter(|fps| *fps > 0.0) {
                    if fps.fract() == 0.0 {
                        quality.push_str(&format!(" {}fps", fps as u64));
                    } else {
                        quality.push_str(&format!(" {fps}fps"));
                    }
                }
                let size = match f.filesize {
                    Some(bytes) if bytes > 0 => {
                        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
                    }
                    _ => "N/A".to_string(),
                };
                Some(FormatRow {
                    quality,
                    extension: f.ext.clone().unwrap_or_else(|| "N/A".to_string()),
                    size,
                    format_id: f.format_id.clone(),
                    video_only: f.is_video_only(),
                })
            })
            .collect()
    }
}

/// What the user asked to download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatChoice {
    /// Best available quality.
    Best,
    /// A format from the table.
    Format { format_id: String, video_only: bool },
}

impl From<&FormatRow> for FormatChoice {
    fn from(row: &FormatRow) -> Self {
        Self::Format {
            format_id: row.format_id.clone(),
            video_only: row.video_only,
        }
    }
}

/// Resolved yt-dlp format arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadPlan {
    pub selector: String,
    pub remux_mp4: bool,
}

impl DownloadPlan {
    /// Builds the selector for `choice` given whether ffmpeg is installed.
    ///
    /// # Errors
    ///
    /// [`DownloadError::FfmpegRequired`] for a video-only format without ffmpeg.
    pub fn new(choice: &FormatChoice, has_ffmpeg: bool) -> Result<Self> {
        match choice {
            FormatChoice::Best if has_ffmpeg => Ok(Self {
                selector: DEFAULT_SELECTOR.to_string(),
                remux_mp4: true,
            }),
            FormatChoice::Best => Ok(Self {
                selector: FALLBACK_SELECTOR.to_string(),
                remux_mp4: false,
            }),
            FormatChoice::Format {
                format_id,
                video_only: true,
            } => {
                if !has_ffmpeg {
                    return Err(DownloadError::FfmpegRequired {
                        format_id: format_id.clone(),
                    });
                }
                Ok(Self {
                    selector: format!("{format_id}+bestaudio/{format_id}"),
                    remux_mp4: false,
                })
            }
            FormatChoice::Format { format_id, .. } => Ok(Self {
                selector: format_id.clone(),
                remux_mp4: false,
            }),
        }
    }
}

/// A yt-dlp executable.
#[derive(Clone, Debug)]
pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Finds yt-dlp on `PATH`.
    pub fn locate() -> Result<Self> {
        which::which(super::deps::YTDLP)
            .map(Self::new)
            .map_err(|_| DownloadError::YtDlpMissing)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.stdin(Stdio::null());
        command
    }

    /// Fetches metadata for a single video without downloading it.
    pub fn fetch_info(&self, url: &str) -> Result<VideoInfo> {
        log::debug!("Fetching metadata for {}", url);
        let output = self
            .command()
            .args(["-J", "--no-warnings", "--no-playlist", url])
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(DownloadError::YtDlp(error_text(&output.stderr)));
        }
        VideoInfo::parse(&output.stdout)
    }

    /// Arguments for a download of `url` into `dir`.
    pub fn download_args(url: &str, plan: &DownloadPlan, dir: &Path) -> Vec<String> {
        let mut args = vec![
            "--newline".to_string(),
            "--progress".to_string(),
            "--no-simulate".to_string(),
            "--no-warnings".to_string(),
            "--no-playlist".to_string(),
            "--concurrent-fragments".to_string(),
            CONCURRENT_FRAGMENTS.to_string(),
            "--progress-template".to_string(),
            PROGRESS_TEMPLATE.to_string(),
            "--print".to_string(),
            FILE_TEMPLATE.to_string(),
            "-f".to_string(),
            plan.selector.clone(),
            "-o".to_string(),
            dir.join(OUTPUT_TEMPLATE).to_string_lossy().into_owned(),
        ];
        if plan.remux_mp4 {
            args.push("--remux-video".to_string());
            args.push("mp4".to_string());
        }
        args.push(url.to_string());
        args
    }

    /// Downloads `url` into `dir`, reporting progress as it arrives.
    ///
    /// Returns the final path reported by yt-dlp after post-processing.
    pub fn download(
        &self,
        url: &str,
        plan: &DownloadPlan,
        dir: &Path,
        on_progress: &mut dyn FnMut(&ProgressUpdate),
    ) -> Result<PathBuf> {
        log::info!("Downloading {} with format {}", url, plan.selector);
        let mut child = self
            .command()
            .args(Self::download_args(url, plan, dir))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Drain stderr concurrently so a chatty extractor cannot block stdout.
        let stderr = child.stderr.take();
        let stderr_reader = thread::spawn(move || {
            let mut text = Vec::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_end(&mut text);
            }
            text
        });

        let mut final_path = None;
        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines() {
                let line = line.map_err(DownloadError::io("reading yt-dlp output", dir))?;
                match parse_line(&line) {
                    OutputLine::Progress(update) => on_progress(&update),
                    OutputLine::File(path) => final_path = Some(path),
                    OutputLine::Other(text) if !text.is_empty() => log::debug!("yt-dlp: {}", text),
                    OutputLine::Other(_) => {}
                }
            }
        }

        let status = child
            .wait()
            .map_err(DownloadError::io("waiting for yt-dlp", &self.program))?;
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            return Err(DownloadError::YtDlp(error_text(&stderr)));
        }
        final_path.ok_or_else(|| {
            DownloadError::YtDlp("yt-dlp finished without reporting the output file".to_string())
        })
    }

    /// Runs `yt-dlp -U` and returns its report.
    pub fn update(&self) -> Result<String> {
        let output = self
            .command()
            .arg("-U")
            .output()
            .map_err(|e| self.spawn_error(e))?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(DownloadError::YtDlp(format!(
                "Failed to update yt-dlp: {}",
                error_text(&output.stderr)
            )))
        }
    }

    fn spawn_error(&self, error: std::io::Error) -> DownloadError {
        if error.kind() == std::io::ErrorKind::NotFound {
            DownloadError::YtDlpMissing
        } else {
            DownloadError::io("running", &self.program)(error)
        }
    }
}

/// Last `ERROR:` line of yt-dlp's stderr, or the whole text.
fn error_text(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    text.lines()
        .rev()
        .find(|line| line.starts_with("ERROR:"))
        .map(str::to_string)
        .unwrap_or_else(|| text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "dQw4w9WgXcQ",
        "title": "Sample Clip",
        "duration": 212.0,
        "uploader": "Sample Channel",
        "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg",
        "formats": [
            {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2", "filesize": 3433514},
            {"format_id": "sb0", "ext": "mhtml", "vcodec": "none", "acodec": "none", "height": 45},
            {"format_id": "137", "ext": "mp4", "height": 1080, "fps": 25, "vcodec": "avc1.640028", "acodec": "none", "filesize": 82386125},
            {"format_id": "18", "ext": "mp4", "height": 360, "fps": 29.97, "vcodec": "avc1.42001E", "acodec": "mp4a.40.2"},
            {"format_id": "hls", "ext": "mp4", "vcodec": "avc1"}
        ]
    }"#;

    #[test]
    fn parses_metadata_summary() {
        let info = VideoInfo::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(info.id, "dQw4w9WgXcQ");
        assert_eq!(
            info.summary(),
            "Title: Sample Clip\nDuration: 212 seconds\nChannel: Sample Channel"
        );
    }

    #[test]
    fn format_table_lists_video_formats_with_height() {
        let info = VideoInfo::parse(SAMPLE.as_bytes()).unwrap();
        let rows = info.format_rows();
        assert_eq!(
            rows,
            vec![
                FormatRow {
                    quality: "1080p 25fps".into(),
                    extension: "mp4".into(),
                    size: "78.6 MB".into(),
                    format_id: "137".into(),
                    video_only: true,
                },
                FormatRow {
                    quality: "360p 29.97fps".into(),
                    extension: "mp4".into(),
                    size: "N/A".into(),
                    format_id: "18".into(),
                    video_only: false,
                },
            ]
        );
        assert!(!rows[0].is_available(false));
        assert!(rows[0].is_available(true));
        assert!(rows[1].is_available(false));
    }

    #[test]
    fn best_selector_degrades_without_ffmpeg() {
        let with = DownloadPlan::new(&FormatChoice::Best, true).unwrap();
        assert_eq!(with.selector, DEFAULT_SELECTOR);
        assert!(with.remux_mp4);

        let without = DownloadPlan::new(&FormatChoice::Best, false).unwrap();
        assert_eq!(without.selector, FALLBACK_SELECTOR);
        assert!(!without.remux_mp4);
    }

    #[test]
    fn video_only_formats_need_ffmpeg() {
        let choice = FormatChoice::Format {
            format_id: "137".into(),
            video_only: true,
        };
        assert!(matches!(
            DownloadPlan::new(&choice, false),
            Err(DownloadError::FfmpegRequired { format_id }) if format_id == "137"
        ));
        assert_eq!(
            DownloadPlan::new(&choice, true).unwrap().selector,
            "137+bestaudio/137"
        );

        let muxed = FormatChoice::Format {
            format_id: "18".into(),
            video_only: false,
        };
        assert_eq!(DownloadPlan::new(&muxed, false).unwrap().selector, "18");
    }

    #[test]
    fn download_arguments_include_templates() {
        let plan = DownloadPlan::new(&FormatChoice::Best, true).unwrap();
        let args = YtDlp::download_args("https://youtu.be/x", &plan, Path::new("/tmp/out"));
        assert!(args.windows(2).any(|w| w[0] == "--progress-template" && w[1] == PROGRESS_TEMPLATE));
        assert!(args.windows(2).any(|w| w[0] == "--print" && w[1] == FILE_TEMPLATE));
        assert!(args.windows(2).any(|w| w[0] == "--remux-video" && w[1] == "mp4"));
        assert!(args.iter().any(|a| a.ends_with("%(title)s.%(ext)s")));
        assert_eq!(args.last().map(String::as_str), Some("https://youtu.be/x"));
    }

    #[test]
    fn error_text_prefers_error_lines() {
        let stderr = b"WARNING: something\nERROR: [youtube] x: HTTP Error 429: Too Many Requests\n";
        assert_eq!(
            error_text(stderr),
            "ERROR: [youtube] x: HTTP Error 429: Too Many Requests"
        );
    }

    #[test]
    fn missing_program_reports_ytdlp_missing() {
        let ytdlp = YtDlp::new("/nonexistent/yt-dlp-for-tests");
        assert!(matches!(
            ytdlp.fetch_info("https://youtu.be/x"),
            Err(DownloadError::YtDlpMissing)
        ));
    }
}
