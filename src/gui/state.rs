//! Window state and the events worker threads send back to it.

use crate::downloader::{DownloadError, FormatChoice, FormatRow, ProgressUpdate, VideoInfo};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Message from a worker thread to the UI thread.
#[derive(Debug)]
pub enum WorkerEvent {
    Info(VideoInfo),
    InfoFailed(String),
    Thumbnail(egui::ColorImage),
    Progress(ProgressUpdate),
    Finished(PathBuf),
    Failed(String),
}

/// Error text shown to the user, with advice for known HTTP failures.
pub fn describe(error: &DownloadError) -> String {
    match error.hint() {
        Some(hint) => format!("{error}\n\n{hint}"),
        None => error.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dialog {
    Warning(String),
    Error { headline: String, details: String },
    /// Download finished; offers to open the file or its folder.
    Completed(PathBuf),
}

#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub path: PathBuf,
    pub finished_at: DateTime<Local>,
}

impl HistoryEntry {
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct AppState {
    pub url: String,
    pub download_dir: PathBuf,
    pub has_ffmpeg: bool,
    pub info: Option<VideoInfo>,
    pub info_text: String,
    pub formats: Vec<FormatRow>,
    pub selected: Option<usize>,
    /// Completed fraction; `None` while the total size is unknown.
    pub progress: Option<f32>,
    pub status: String,
    pub fetching: bool,
    pub downloading: bool,
    pub history: Vec<HistoryEntry>,
    pub dialog: Option<Dialog>,
}

impl AppState {
    pub fn new(download_dir: PathBuf, has_ffmpeg: bool) -> Self {
        Self {
            url: String::new(),
            download_dir,
            has_ffmpeg,
            info: None,
            info_text: String::new(),
            formats: Vec::new(),
            selected: None,
            progress: Some(0.0),
            status: "Ready".to_string(),
            fetching: false,
            downloading: false,
            history: Vec::new(),
            dialog: None,
        }
    }

    pub fn busy(&self) -> bool {
        self.fetching || self.downloading
    }

    pub fn can_fetch(&self) -> bool {
        !self.busy()
    }

    /// The Download button is enabled once metadata has been fetched.
    pub fn can_download(&self) -> bool {
        self.info.is_some() && !self.busy()
    }

    /// Starts a metadata fetch, returning the URL to fetch.
    pub fn begin_fetch(&mut self) -> Option<String> {
        let url = self.url.trim().to_string();
        if url.is_empty() {
            self.dialog = Some(Dialog::Warning("Please enter a video URL".to_string()));
            return None;
        }
        self.fetching = true;
        self.info_text = "Fetching video information...".to_string();
        Some(url)
    }

    /// Starts a download of the selected format.
    pub fn begin_download(&mut self) -> Option<(String, FormatChoice)> {
        let Some(row) = self.selected.and_then(|i| self.formats.get(i)) else {
            self.dialog = Some(Dialog::Warning("Please select a format".to_string()));
            return None;
        };
        if !row.is_available(self.has_ffmpeg) {
            self.dialog = Some(Dialog::Warning(format!(
                "Format {} has no audio track and needs ffmpeg, which is not installed",
                row.format_id
            )));
            return None;
        }

        let choice = FormatChoice::from(row);
        self.downloading = true;
        self.progress = Some(0.0);
        self.status = "Downloading...".to_string();
        Some((self.url.trim().to_string(), choice))
    }

    /// Applies a worker event. Thumbnails are handled by the window.
    pub fn apply(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Info(info) => {
                self.fetching = false;
                self.info_text = info.summary();
                self.formats = info.format_rows();
                self.selected = None;
                self.info = Some(info);
            }
            WorkerEvent::InfoFailed(message) => {
                self.fetching = false;
                self.info_text.clear();
                self.dialog = Some(Dialog::Error {
                    headline: "Error fetching video info".to_string(),
                    details: message,
                });
            }
            WorkerEvent::Progress(update) => {
                self.progress = update.progress.fraction();
                self.status = update.status();
            }
            WorkerEvent::Finished(path) => {
                self.downloading = false;
                self.progress = Some(1.0);
                self.status = format!("Downloaded: {}", display_name(&path));
                self.history.push(HistoryEntry {
                    path: path.clone(),
                    finished_at: Local::now(),
                });
                self.dialog = Some(Dialog::Completed(path));
            }
            WorkerEvent::Failed(message) => {
                self.downloading = false;
                self.status = "Error".to_string();
                self.dialog = Some(Dialog::Error {
                    headline: "Download failed!".to_string(),
                    details: message,
                });
            }
            WorkerEvent::Thumbnail(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::{Progress, VideoInfo};

    fn info() -> VideoInfo {
        VideoInfo::parse(
            br#"{"id": "x", "title": "Clip", "duration": 61, "formats": [
                {"format_id": "137", "ext": "mp4", "height": 1080, "vcodec": "avc1", "acodec": "none"},
                {"format_id": "18", "ext": "mp4", "height": 360, "vcodec": "avc1", "acodec": "mp4a"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn empty_url_warns_instead_of_fetching() {
        let mut state = AppState::new(PathBuf::from("/tmp"), true);
        state.url = "   ".into();
        assert_eq!(state.begin_fetch(), None);
        assert!(matches!(state.dialog, Some(Dialog::Warning(_))));
        assert!(!state.fetching);
    }

    #[test]
    fn download_enabled_only_after_fetch() {
        let mut state = AppState::new(PathBuf::from("/tmp"), true);
        state.url = "https://youtu.be/x".into();
        assert!(!state.can_download());

        assert_eq!(state.begin_fetch().as_deref(), Some("https://youtu.be/x"));
        assert!(!state.can_download());

        state.apply(WorkerEvent::Info(info()));
        assert!(state.can_download());
        assert_eq!(state.formats.len(), 2);
        assert!(state.info_text.starts_with("Title: Clip"));
    }

    #[test]
    fn download_requires_selection() {
        let mut state = AppState::new(PathBuf::from("/tmp"), true);
        state.url = "https://youtu.be/x".into();
        state.apply(WorkerEvent::Info(info()));

        assert!(state.begin_download().is_none());
        assert_eq!(
            state.dialog,
            Some(Dialog::Warning("Please select a format".into()))
        );

        state.dialog = None;
        state.selected = Some(1);
        let (url, choice) = state.begin_download().unwrap();
        assert_eq!(url, "https://youtu.be/x");
        assert_eq!(
            choice,
            FormatChoice::Format {
                format_id: "18".into(),
                video_only: false
            }
        );
        assert!(state.downloading);
        assert!(!state.can_download());
    }

    #[test]
    fn video_only_format_blocked_without_ffmpeg() {
        let mut state = AppState::new(PathBuf::from("/tmp"), false);
        state.url = "https://youtu.be/x".into();
        state.apply(WorkerEvent::Info(info()));
        state.selected = Some(0);
        assert!(state.begin_download().is_none());
        assert!(!state.downloading);
    }

    #[test]
    fn completion_updates_history_and_dialog() {
        let mut state = AppState::new(PathBuf::from("/tmp"), true);
        state.downloading = true;
        state.apply(WorkerEvent::Progress(ProgressUpdate::new(Progress::Percent(40.0))));
        assert_eq!(state.progress, Some(0.4));

        let path = PathBuf::from("/tmp/Clip.mp4");
        state.apply(WorkerEvent::Finished(path.clone()));
        assert!(!state.downloading);
        assert_eq!(state.status, "Downloaded: Clip.mp4");
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].file_name(), "Clip.mp4");
        assert_eq!(state.dialog, Some(Dialog::Completed(path)));
    }

    #[test]
    fn failures_include_hints() {
        let error = DownloadError::YtDlp("ERROR: HTTP Error 403: Forbidden".into());
        let mut state = AppState::new(PathBuf::from("/tmp"), true);
        state.downloading = true;
        state.apply(WorkerEvent::Failed(describe(&error)));
        assert_eq!(state.status, "Error");
        match &state.dialog {
            Some(Dialog::Error { details, .. }) => {
                assert!(details.contains("regional restrictions"));
            }
            other => panic!("unexpected dialog {other:?}"),
        }
    }
}
