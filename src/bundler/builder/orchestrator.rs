//! Main bundler orchestration and coordination.

use super::{analysis, archive, checksum::calculate_sha256, emit};
use crate::bundler::{
    BundledArtifact, PackageType, Result,
    error::ErrorExt,
    harvest::{
        self, CargoMetadataResolver, DataFile, DataKind, ModuleResolver,
        check_unique_destinations,
    },
    platform::{Platform, linux, macos, windows},
    settings::Settings,
};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Non-fatal condition recorded during a build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildWarning {
    /// A configured icon does not exist; the build continues without one.
    MissingIcon { path: PathBuf },
    /// A Windows target binary is not a PE image; its subsystem was not set.
    NotPortableExecutable { path: PathBuf },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIcon { path } => {
                write!(f, "icon {} not found, building without an icon", path.display())
            }
            Self::NotPortableExecutable { path } => write!(
                f,
                "{} is not a PE executable, console/windowed mode left unchanged",
                path.display()
            ),
        }
    }
}

/// Outcome of a successful build.
#[derive(Clone, Debug)]
pub struct BuildReport {
    /// Produced artifacts, the runnable output first.
    pub artifacts: Vec<BundledArtifact>,
    pub warnings: Vec<BuildWarning>,
    /// Data files embedded in the build.
    pub data_files: Vec<DataFile>,
    /// Icon actually used, if any.
    pub icon: Option<PathBuf>,
}

impl BuildReport {
    /// Path of the runnable output (executable, folder or `.app`).
    pub fn primary_output(&self) -> Option<&Path> {
        self.artifacts
            .first()
            .and_then(|artifact| artifact.paths.first())
            .map(PathBuf::as_path)
    }
}

/// Main bundler orchestrator.
///
/// Runs the build steps strictly in sequence:
///
/// 1. analyze (entry point, `cargo build`, binary)
/// 2. icon guard
/// 3. harvest (themes, resources, binaries)
/// 4. archive
/// 5. emit
/// 6. wrap (macOS only)
/// 7. release archive (optional)
/// 8. checksums
///
/// Nothing is written before the entry point and the theme library have been
/// resolved.
pub struct Bundler {
    settings: Settings,
    resolver: Box<dyn ModuleResolver + Send + Sync>,
}

impl fmt::Debug for Bundler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundler")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Bundler {
    /// Creates a bundler resolving libraries through `cargo metadata`.
    pub fn new(settings: Settings) -> Self {
        let resolver = CargoMetadataResolver::new(settings.project_root().join("Cargo.toml"));
        Self::with_resolver(settings, resolver)
    }

    /// Creates a bundler with an explicit library resolver.
    pub fn with_resolver(
        settings: Settings,
        resolver: impl ModuleResolver + Send + Sync + 'static,
    ) -> Self {
        Self {
            settings,
            resolver: Box::new(resolver),
        }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs the build.
    ///
    /// # Errors
    ///
    /// - [`Error::BuildFailure`](crate::bundler::Error::BuildFailure) when the
    ///   entry point or compiled binary is missing, data destinations collide
    ///   or an output cannot be written
    /// - [`Error::ModuleResolution`](crate::bundler::Error::ModuleResolution)
    ///   when the theme library cannot be located
    pub async fn bundle(&self) -> Result<BuildReport> {
        let settings = &self.settings;
        let mut warnings = Vec::new();

        log::info!(
            "Building {} {} for {}",
            settings.product_name(),
            settings.version_string(),
            settings.platform()
        );

        analysis::verify_entry_point(settings).await?;
        let icon = analysis::resolve_icon(settings, &mut warnings).await;
        let data_files = self.collect_data_files(icon.as_deref())?;

        if settings.compile() {
            analysis::compile(settings).await?;
        }
        let binary = analysis::verify_binary(settings).await?;

        let manifest = archive::build_manifest(settings, &data_files);
        let archive = archive::write_archive(settings, &data_files, &manifest).await?;
        let emitted = emit::emit(settings, &binary, &archive, &data_files, &mut warnings).await?;

        let (primary_type, primary) = match settings.platform() {
            Platform::MacOs => {
                let app = macos::app::bundle_project(
                    settings,
                    &emitted,
                    icon.as_deref(),
                    &data_files,
                    &archive.manifest_path,
                )
                .await?;
                (PackageType::AppBundle, app)
            }
            Platform::Windows | Platform::Linux => (emitted.package_type, emitted.path.clone()),
        };

        let mut outputs = vec![(primary_type, primary.clone())];
        if primary_type == PackageType::AppBundle {
            outputs.push((emitted.package_type, emitted.path.clone()));
        }

        if settings.release_archive() {
            let release = match settings.platform() {
                Platform::Windows => (
                    PackageType::Zip,
                    windows::release::create_zip(settings, &primary).await?,
                ),
                Platform::MacOs => (
                    PackageType::Dmg,
                    macos::dmg::bundle_project(settings, &primary).await?,
                ),
                Platform::Linux => (
                    PackageType::TarGz,
                    linux::release::create_tarball(settings, &primary).await?,
                ),
            };
            outputs.push(release);
        }

        let mut artifacts = Vec::with_capacity(outputs.len());
        for (package_type, path) in outputs {
            artifacts.push(artifact(package_type, path).await?);
        }

        Ok(BuildReport {
            artifacts,
            warnings,
            data_files,
            icon,
        })
    }

    /// Harvested themes, descriptor resources, extra binaries and (Windows)
    /// the icon, checked for colliding destinations.
    fn collect_data_files(&self, icon: Option<&Path>) -> Result<Vec<DataFile>> {
        let settings = &self.settings;
        let mut files = Vec::new();

        if let Some(library) = settings.theme_library() {
            files.extend(harvest::harvest_theme_resources(
                self.resolver.as_ref(),
                library,
            )?);
        }
        files.extend(harvest::collect_resources(
            settings.project_root(),
            settings.resource_patterns(),
        )?);
        files.extend(harvest::collect_binaries(&settings.extra_binaries())?);

        if let (Platform::Windows, Some(icon)) = (settings.platform(), icon) {
            let name = icon
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "icon.ico".to_string());
            files.push(DataFile {
                destination: name,
                source: icon.to_path_buf(),
                kind: DataKind::Data,
            });
        }

        check_unique_destinations(&files, settings.platform())?;
        Ok(files)
    }
}

/// Sizes and checksums one output.
async fn artifact(package_type: PackageType, path: PathBuf) -> Result<BundledArtifact> {
    let size = total_size(&path).await?;
    let checksum = calculate_sha256(&path).await?;
    log::info!("{} {} ({} bytes, sha256 {})", package_type, path.display(), size, checksum);

    Ok(BundledArtifact {
        package_type,
        paths: vec![path],
        size,
        checksum,
    })
}

async fn total_size(path: &Path) -> Result<u64> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;
    if metadata.is_file() {
        return Ok(metadata.len());
    }

    let mut size = 0;
    for entry in walkdir::WalkDir::new(path) {
        let entry = entry?;
        if entry.file_type().is_file() {
            size += entry.metadata()?.len();
        }
    }
    Ok(size)
}
