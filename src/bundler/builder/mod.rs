//! Build orchestration.
//!
//! This module provides the [`Bundler`] orchestrator that runs the packaging
//! steps in order and reports what it produced.
//!
//! # Example
//!
//! ```no_run
//! use video_downloader::bundler::{Bundler, Settings};
//!
//! # async fn example(settings: Settings) -> video_downloader::bundler::Result<()> {
//! let bundler = Bundler::new(settings);
//! let report = bundler.bundle().await?;
//!
//! for artifact in &report.artifacts {
//!     println!("Created: {} ({} bytes)", artifact.package_type, artifact.size);
//!     println!("SHA256: {}", artifact.checksum);
//! }
//! for warning in &report.warnings {
//!     println!("warning: {warning}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`analysis`] - entry point, binary and icon checks
//! - [`archive`] - intermediate resource archive and manifest
//! - [`emit`] - onefile and folder output
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - Main [`Bundler`] struct
//! - [`tool_detection`] - External tool availability checking

pub mod analysis;
pub mod archive;
pub mod checksum;
pub mod emit;
mod orchestrator;
pub mod tool_detection;

pub use emit::{Emitted, copy_data_files};
pub use orchestrator::{BuildReport, BuildWarning, Bundler};
