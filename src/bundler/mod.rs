//! Packaging pipeline.
//!
//! Turns the GUI application into a self-contained distributable:
//! a single executable (Windows, Linux), a folder build, or a macOS `.app`
//! bundle, with the styling library's theme files embedded.
//!
//! The pipeline is strictly sequential: analyze, harvest, archive, emit,
//! wrap (macOS only), release, checksum. See [`Bundler`].

pub mod builder;
pub mod error;
pub mod harvest;
pub mod platform;
pub mod resources;
pub mod settings;
pub mod utils;

pub use builder::{BuildReport, BuildWarning, Bundler};
pub use error::{Error, Result};
pub use harvest::{
    CargoMetadataResolver, DataFile, DataKind, ModuleResolver, StaticResolver, ThemeLibrary,
    harvest_theme_resources,
};
pub use platform::{BundledArtifact, PackageType, Platform};
pub use settings::{
    BundleBinary, BundleMetadata, BundleSettings, MacOsSettings, OutputSettings, PackageSettings,
    Settings, SettingsBuilder, Subsystem,
};
