//! Package metadata and configuration.

/// Package metadata and configuration.
///
/// Contains core package information, typically read from the `[package]`
/// section of `Cargo.toml`.
///
/// # Examples
///
/// ```no_run
/// use video_downloader::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     product_name: "video-downloader".into(),
///     version: "1.0.0".into(),
///     description: "Material styled video downloader".into(),
///     homepage: None,
///     authors: Some(vec!["tolstoyj".into()]),
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackageSettings {
    /// Package name. Used as the product name unless the descriptor
    /// overrides it with `name`.
    pub product_name: String,

    /// Version string from `Cargo.toml`.
    ///
    /// Used for bundle version strings unless the descriptor sets `version`.
    pub version: String,

    /// Brief description of the application.
    pub description: String,

    /// Homepage URL for the application.
    pub homepage: Option<String>,

    /// List of package authors.
    pub authors: Option<Vec<String>>,
}
