//! Video Downloader: a material-styled desktop video downloader and the
//! packager that ships it.
//!
//! - [`downloader`] - URL routing, yt-dlp integration and direct downloads
//! - [`gui`] - the eframe/egui window
//! - [`runtime`] - resource location and startup checks inside packaged builds
//! - [`bundler`] - turns the GUI binary into a Windows executable, a macOS
//!   `.app` or a Linux executable
//! - [`cli`] and [`metadata`] - the `videodownloader-bundle` command line

pub mod bundler;
pub mod cli;
pub mod downloader;
pub mod error;
pub mod gui;
pub mod metadata;
pub mod runtime;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
