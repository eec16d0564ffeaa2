//! macOS targets: the `.app` wrapper and the release disk image.

pub mod app;
pub mod dmg;
