//! Configuration structures for bundling operations.
//!
//! This module provides the build descriptor types (deserialized from
//! `[package.metadata.bundle]`), the validated [`Settings`] the pipeline runs
//! on, and the [`SettingsBuilder`] that turns one into the other.

mod builder;
mod bundle;
mod core;
mod macos;
mod package;
mod windows;

pub use builder::SettingsBuilder;
pub use bundle::{BundleBinary, BundleSettings};
pub use core::Settings;
pub use macos::{BundleMetadata, MacOsSettings, is_dotted_version, is_reverse_domain};
pub use package::PackageSettings;
pub use windows::{OutputSettings, Subsystem};
