//! `videodownloader-bundle`: packages the Video Downloader GUI for Windows,
//! macOS or Linux.

use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let exit_code = match video_downloader::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
