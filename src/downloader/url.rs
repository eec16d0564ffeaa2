//! URL validation and extractor routing.

use super::error::{DownloadError, Result};
use url::Url;

/// Sites handed to yt-dlp; subdomains match too.
pub const YTDLP_HOSTS: [&str; 4] = ["youtube.com", "youtu.be", "vimeo.com", "dailymotion.com"];

/// How a URL is downloaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    YtDlp,
    Direct,
}

/// Parses `input` and requires both a scheme and a host.
pub fn validate(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed).map_err(|_| DownloadError::InvalidUrl(trimmed.to_string()))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(DownloadError::InvalidUrl(trimmed.to_string())),
    }
}

pub fn route(url: &Url) -> Route {
    let Some(host) = url.host_str() else {
        return Route::Direct;
    };
    let host = host.to_ascii_lowercase();
    let supported = YTDLP_HOSTS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")));

    if supported { Route::YtDlp } else { Route::Direct }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_urls_without_scheme_or_host() {
        assert!(matches!(validate("not a url"), Err(DownloadError::InvalidUrl(_))));
        assert!(matches!(validate("www.youtube.com/watch?v=x"), Err(DownloadError::InvalidUrl(_))));
        assert!(matches!(validate("mailto:someone@example.com"), Err(DownloadError::InvalidUrl(_))));
        assert!(validate("  https://example.com/clip.mp4 ").is_ok());
    }

    #[test]
    fn routes_supported_sites_to_ytdlp() {
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://vimeo.com/76979871",
            "https://www.dailymotion.com/video/x7tgad0",
            "https://m.YouTube.com/watch?v=abc",
        ] {
            assert_eq!(route(&validate(input).unwrap()), Route::YtDlp, "{input}");
        }
    }

    #[test]
    fn other_hosts_download_directly() {
        for input in [
            "https://example.com/video.mp4",
            "https://notyoutube.com/watch",
            "https://cdn.example.org/youtube.com/file.webm",
        ] {
            assert_eq!(route(&validate(input).unwrap()), Route::Direct, "{input}");
        }
    }
}
