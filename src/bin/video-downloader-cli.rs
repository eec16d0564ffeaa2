//! Command-line video downloader.
//!
//! Downloads one URL into a directory, prompting for the URL when none is
//! given. Site URLs go through yt-dlp, anything else is fetched directly.

use anyhow::Context;
use clap::Parser;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};
use video_downloader::downloader::{DownloadError, ProgressUpdate, VideoDownloader};

#[derive(Parser, Debug)]
#[command(
    name = "video-downloader-cli",
    version,
    about = "Download videos from YouTube, Vimeo, Dailymotion or direct links"
)]
struct Args {
    /// Video URL; prompted for when omitted
    url: Option<String>,

    /// Directory downloads are saved to
    #[arg(short, long, default_value = "downloads")]
    output: PathBuf,

    /// Print title, duration and available formats without downloading
    #[arg(long)]
    info: bool,

    /// Update yt-dlp and exit
    #[arg(long, conflicts_with_all = ["url", "info"])]
    update: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let downloader = VideoDownloader::new(&args.output)
        .with_context(|| format!("cannot use download directory {}", args.output.display()))?;

    if args.update {
        println!("{}", downloader.update_ytdlp()?);
        return Ok(());
    }

    let url = match args.url {
        Some(url) => url,
        None => prompt("Enter video URL to download: ")?,
    };

    if args.info {
        let info = downloader.fetch_info(&url)?;
        print_info(&info);
        return Ok(());
    }

    match downloader.download(&url, print_progress) {
        Ok(path) => {
            println!("\nVideo downloaded successfully to: {}", path.display());
            Ok(())
        }
        Err(e) => {
            report(&e);
            anyhow::bail!("Failed to download video")
        }
    }
}

fn prompt(message: &str) -> anyhow::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_progress(update: &ProgressUpdate) {
    print!("\r{}", update.progress);
    let _ = io::stdout().flush();
}

fn print_info(info: &video_downloader::downloader::VideoInfo) {
    println!("{}", info.summary());
    if let Some(description) = info.description.as_deref() {
        let short: String = description.chars().take(200).collect();
        println!("Description: {short}...");
    }

    println!("\nAvailable formats:");
    println!("{:<16} {:<10} {:<12} {}", "Quality", "Extension", "Size", "Format Code");
    for row in info.format_rows() {
        println!(
            "{:<16} {:<10} {:<12} {}",
            row.quality, row.extension, row.size, row.format_id
        );
    }
}

fn report(error: &DownloadError) {
    eprintln!("\nError downloading video: {error}");
    if let Some(hint) = error.hint() {
        eprintln!("{hint}");
    }
}
