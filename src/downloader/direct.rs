//! Plain HTTP downloads for URLs no extractor handles.

use super::{
    error::{DownloadError, Result},
    filename::sanitize,
    progress::{Progress, ProgressUpdate},
};
use regex::Regex;
use reqwest::{
    blocking::Client,
    header::{CONTENT_DISPOSITION, HeaderMap},
};
use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::{Path, PathBuf},
    sync::LazyLock,
};
use url::Url;

/// Desktop browser User-Agent; some hosts refuse unknown clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const CHUNK_SIZE: usize = 8192;

/// Used when neither the response nor the URL names the file.
pub const FALLBACK_FILENAME: &str = "video.mp4";

static DISPOSITION_FILENAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new("filename=(.+)").ok());

pub fn client() -> Result<Client> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

/// File name named by a `Content-Disposition` header value.
pub fn filename_from_disposition(value: &str) -> Option<String> {
    let regex = DISPOSITION_FILENAME.as_ref()?;
    let name = regex.captures(value)?.get(1)?.as_str().trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Last segment of the URL path.
pub fn filename_from_url(url: &Url) -> Option<String> {
    let name = url.path().rsplit('/').next()?;
    (!name.is_empty()).then(|| name.to_string())
}

/// Chooses the sanitized local file name for a response.
pub fn target_filename(headers: &HeaderMap, url: &Url) -> String {
    let chosen = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(filename_from_disposition)
        .or_else(|| filename_from_url(url));

    let sanitized = chosen.map(|name| sanitize(&name)).unwrap_or_default();
    if sanitized.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// Streams `url` into `dir` in [`CHUNK_SIZE`] blocks.
pub fn download(
    url: &Url,
    dir: &Path,
    on_progress: &mut dyn FnMut(&ProgressUpdate),
) -> Result<PathBuf> {
    let mut response = client()?.get(url.clone()).send()?.error_for_status()?;
    let filename = target_filename(response.headers(), url);
    let output = dir.join(&filename);
    let total = response.content_length().filter(|len| *len > 0);

    log::info!("Downloading: {}", filename);
    let file = File::create(&output).map_err(DownloadError::io("creating", &output))?;
    let mut writer = BufWriter::new(file);
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut downloaded = 0u64;

    loop {
        let n = response
            .read(&mut buffer)
            .map_err(DownloadError::io("downloading to", &output))?;
        if n == 0 {
            break;
        }
        writer
            .write_all(&buffer[..n])
            .map_err(DownloadError::io("writing", &output))?;
        downloaded += n as u64;
        on_progress(&ProgressUpdate::new(Progress::from_bytes(downloaded, total)));
    }
    writer
        .flush()
        .map_err(DownloadError::io("writing", &output))?;

    log::info!("Successfully downloaded: {}", filename);
    Ok(output)
}

/// Fetches a thumbnail image.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let response = client()?.get(url).send()?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}
