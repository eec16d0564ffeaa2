//! Video Downloader desktop application.
//!
//! Before the window opens, bundled resources are located and the hidden
//! imports recorded at build time are checked against this binary. Any
//! failure is written to the startup log, shown in a native dialog, and ends
//! the process with status 1.

use std::{path::PathBuf, process};
use video_downloader::{
    downloader, gui,
    runtime::{Resources, report_startup_failure},
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let resources = match Resources::locate().and_then(|resources| {
        resources.verify()?;
        Ok(resources)
    }) {
        Ok(resources) => resources,
        Err(e) => {
            report_startup_failure(&e);
            process::exit(1);
        }
    };
    log::debug!("Resources loaded from {:?}", resources.source);

    let theme = match resources.theme(qt_material::DEFAULT_THEME) {
        Ok(theme) => theme,
        Err(e) => {
            report_startup_failure(&e);
            process::exit(1);
        }
    };

    let download_dir =
        downloader::default_download_dir().unwrap_or_else(|| PathBuf::from("downloads"));
    if let Err(e) = gui::run(theme, download_dir) {
        log::error!("Window closed with an error: {}", e);
        process::exit(1);
    }
}
