//! Desktop window built on eframe/egui.
//!
//! The window never blocks on network or subprocess work: metadata fetches,
//! thumbnail loads and downloads run on worker threads that report back over
//! an `mpsc` channel drained once per frame.

pub mod app;
pub mod reveal;
pub mod state;
pub mod theme;

pub use app::VideoDownloaderApp;

use crate::bundler::resources::icons::render_icon;
use std::path::PathBuf;

pub const WINDOW_TITLE: &str = "Video Downloader";
pub const MIN_WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];

/// Window icon edge length in pixels.
const ICON_SIZE: u32 = 256;

pub fn native_options() -> eframe::NativeOptions {
    let icon = render_icon(ICON_SIZE);
    let (width, height) = icon.dimensions();
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(MIN_WINDOW_SIZE)
            .with_min_inner_size(MIN_WINDOW_SIZE)
            .with_icon(egui::IconData {
                rgba: icon.into_raw(),
                width,
                height,
            }),
        ..Default::default()
    }
}

/// Opens the main window and blocks until it is closed.
pub fn run(theme: qt_material::Theme, download_dir: PathBuf) -> eframe::Result<()> {
    log::info!("Starting {} with theme {}", WINDOW_TITLE, theme.name());
    eframe::run_native(
        WINDOW_TITLE,
        native_options(),
        Box::new(move |cc| Ok(Box::new(VideoDownloaderApp::new(cc, &theme, download_dir)))),
    )
}
