//! Download progress reporting and yt-dlp output parsing.
//!
//! yt-dlp is run with a progress template that prints one machine-readable
//! line per update:
//!
//! ```text
//! vdl-progress <downloaded> <total> <total_estimate> <speed> <eta>
//! ```
//!
//! Missing values are printed as `NA`. The final file path is printed after
//! post-processing as `vdl-file <path>`.

use std::{fmt, path::PathBuf};

pub const PROGRESS_TAG: &str = "vdl-progress";
pub const FILE_TAG: &str = "vdl-file";

/// Value passed to `--progress-template`.
pub const PROGRESS_TEMPLATE: &str = "download:vdl-progress %(progress.downloaded_bytes)s %(progress.total_bytes)s %(progress.total_bytes_estimate)s %(progress.speed)s %(progress.eta)s";

/// Value passed to `--print` to report the final path.
pub const FILE_TEMPLATE: &str = "after_move:vdl-file %(filepath)s";

const MIB: f64 = 1024.0 * 1024.0;

/// How far a download has got.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Progress {
    /// Percentage of a known total.
    Percent(f64),
    /// Megabytes received when the total is unknown.
    Megabytes(f64),
}

impl Progress {
    pub fn from_bytes(downloaded: u64, total: Option<u64>) -> Self {
        match total {
            Some(total) if total > 0 => Self::Percent(downloaded as f64 / total as f64 * 100.0),
            _ => Self::Megabytes(downloaded as f64 / MIB),
        }
    }

    /// Completed fraction in `0.0..=1.0`, if the total is known.
    pub fn fraction(&self) -> Option<f32> {
        match self {
            Self::Percent(p) => Some((p / 100.0).clamp(0.0, 1.0) as f32),
            Self::Megabytes(_) => None,
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "Download Progress: {p:.1}%"),
            Self::Megabytes(mb) => write!(f, "Downloaded: {mb:.1}MB"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressUpdate {
    pub progress: Progress,
    /// Bytes per second.
    pub speed: Option<f64>,
    /// Seconds remaining.
    pub eta: Option<u64>,
}

impl ProgressUpdate {
    pub fn new(progress: Progress) -> Self {
        Self {
            progress,
            speed: None,
            eta: None,
        }
    }

    /// Status line such as `Download Progress: 42.0% at 1.5 MB/s, ETA 12s`.
    pub fn status(&self) -> String {
        let mut status = self.progress.to_string();
        if let Some(speed) = self.speed {
            status.push_str(&format!(" at {:.1} MB/s", speed / MIB));
        }
        if let Some(eta) = self.eta {
            status.push_str(&format!(", ETA {eta}s"));
        }
        status
    }
}

/// One line of yt-dlp standard output.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputLine<'a> {
    Progress(ProgressUpdate),
    File(PathBuf),
    Other(&'a str),
}

pub fn parse_line(line: &str) -> OutputLine<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(rest) = line.strip_prefix(FILE_TAG) {
        let path = rest.trim();
        if !path.is_empty() {
            return OutputLine::File(PathBuf::from(path));
        }
    }
    match parse_progress(line) {
        Some(update) => OutputLine::Progress(update),
        None => OutputLine::Other(line),
    }
}

/// Parses a `vdl-progress` line.
///
/// Returns `None` for other lines and for progress lines without a
/// downloaded byte count.
pub fn parse_progress(line: &str) -> Option<ProgressUpdate> {
    let mut fields = line.trim().split_whitespace();
    if fields.next()? != PROGRESS_TAG {
        return None;
    }

    let downloaded = number(fields.next())?;
    let total = number(fields.next());
    let estimate = number(fields.next());
    let speed = number(fields.next());
    let eta = number(fields.next());

    let total = total.or(estimate).map(|t| t as u64);
    Some(ProgressUpdate {
        progress: Progress::from_bytes(downloaded as u64, total),
        speed,
        eta: eta.map(|e| e as u64),
    })
}

fn number(field: Option<&str>) -> Option<f64> {
    field
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value >= 0.0)
}
