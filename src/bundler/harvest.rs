//! Data file collection.
//!
//! The theme harvester locates the installed styling library through a
//! [`ModuleResolver`] and registers every theme definition file it ships as a
//! bundled data file under `<library>/<file>`. Descriptor `resources` globs
//! and extra `binaries` are collected here too, and the combined list is
//! checked for colliding destinations before anything is written.

use crate::bundler::{
    Error, Platform, Result,
    error::{Context, ErrorExt},
};
use serde::Deserialize;
use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    process::Command,
};

/// Whether a bundled file is plain data or an executable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Data,
    Binary,
}

/// One file placed into the bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataFile {
    /// Relative destination inside the bundle, `/`-separated.
    pub destination: String,
    /// Absolute source path on the build host.
    pub source: PathBuf,
    pub kind: DataKind,
}

/// Styling library whose theme files are harvested.
///
/// ```toml
/// [package.metadata.bundle.theme_library]
/// name = "qt_material"
/// subdir = "themes"
/// suffix = ".xml"
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct ThemeLibrary {
    /// Package name of the library; also the destination prefix.
    pub name: String,
    /// Directory below the library root holding the theme files.
    #[serde(default = "default_subdir")]
    pub subdir: PathBuf,
    /// File name suffix identifying theme files.
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

fn default_subdir() -> PathBuf {
    PathBuf::from(qt_material::THEME_DIR)
}

fn default_suffix() -> String {
    qt_material::THEME_SUFFIX.to_string()
}

impl Default for ThemeLibrary {
    fn default() -> Self {
        Self {
            name: qt_material::LIBRARY_NAME.to_string(),
            subdir: default_subdir(),
            suffix: default_suffix(),
        }
    }
}

/// Locates the installed root directory of a library.
pub trait ModuleResolver {
    fn resolve(&self, library: &str) -> Result<PathBuf>;
}

/// Resolves libraries through `cargo metadata`.
///
/// Workspace members are tried first (`--no-deps`, no network or registry
/// access), then the full dependency graph.
#[derive(Clone, Debug)]
pub struct CargoMetadataResolver {
    manifest_path: PathBuf,
}

impl CargoMetadataResolver {
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
        }
    }

    fn metadata(&self, no_deps: bool) -> Result<String> {
        let mut command = Command::new("cargo");
        command
            .args(["metadata", "--format-version", "1", "--manifest-path"])
            .arg(&self.manifest_path);
        if no_deps {
            command.arg("--no-deps");
        }

        let output = command.output().context("running cargo metadata")?;
        if !output.status.success() {
            return Err(Error::GenericError(format!(
                "cargo metadata failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        String::from_utf8(output.stdout).context("cargo metadata printed invalid UTF-8")
    }
}

impl ModuleResolver for CargoMetadataResolver {
    fn resolve(&self, library: &str) -> Result<PathBuf> {
        for no_deps in [true, false] {
            let json = self
                .metadata(no_deps)
                .map_err(|e| Error::module_resolution(library, e.to_string()))?;
            if let Some(root) = locate_package(&json, library)? {
                log::debug!("Resolved {} to {}", library, root.display());
                return Ok(root);
            }
        }

        Err(Error::module_resolution(
            library,
            format!(
                "no package named `{library}` in the dependency graph of {}",
                self.manifest_path.display()
            ),
        ))
    }
}

#[derive(Deserialize)]
struct CargoMetadata {
    packages: Vec<MetadataPackage>,
}

#[derive(Deserialize)]
struct MetadataPackage {
    name: String,
    manifest_path: PathBuf,
}

/// Finds a package in `cargo metadata` output and returns its root directory.
///
/// `-` and `_` are treated as equivalent in package names.
pub fn locate_package(metadata_json: &str, library: &str) -> Result<Option<PathBuf>> {
    let metadata: CargoMetadata = serde_json::from_str(metadata_json)?;
    let wanted = library.replace('-', "_");

    Ok(metadata
        .packages
        .into_iter()
        .find(|package| package.name.replace('-', "_") == wanted)
        .and_then(|package| package.manifest_path.parent().map(Path::to_path_buf)))
}

/// Explicit library name to directory map.
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    roots: HashMap<String, PathBuf>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `root` as the installed location of `library`.
    pub fn with(mut self, library: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.roots.insert(library.into(), root.into());
        self
    }
}

impl ModuleResolver for StaticResolver {
    fn resolve(&self, library: &str) -> Result<PathBuf> {
        self.roots
            .get(library)
            .cloned()
            .ok_or_else(|| Error::module_resolution(library, "no location registered"))
    }
}

/// Registers every theme file of `library` as bundled data.
///
/// Only regular files whose name ends with the library suffix are kept. The
/// result is sorted by file name, so the same installation always yields the
/// same list.
///
/// # Errors
///
/// [`Error::ModuleResolution`] when the library cannot be located or its
/// theme directory does not exist.
pub fn harvest_theme_resources(
    resolver: &dyn ModuleResolver,
    library: &ThemeLibrary,
) -> Result<Vec<DataFile>> {
    let root = resolver.resolve(&library.name)?;
    let theme_dir = root.join(&library.subdir);
    if !theme_dir.is_dir() {
        return Err(Error::module_resolution(
            &library.name,
            format!("theme directory {} does not exist", theme_dir.display()),
        ));
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(&theme_dir).fs_context("reading theme directory", &theme_dir)? {
        let entry = entry.fs_context("reading theme directory", &theme_dir)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.ends_with(&library.suffix) => names.push(name.to_string()),
            _ => {}
        }
    }
    names.sort();

    let mut files = Vec::with_capacity(names.len());
    for name in names {
        let path = theme_dir.join(&name);
        let source = path.canonicalize().fs_context("resolving theme file", &path)?;
        files.push(DataFile {
            destination: format!("{}/{}", library.name, name),
            source,
            kind: DataKind::Data,
        });
    }

    log::info!(
        "Harvested {} theme file(s) from {}",
        files.len(),
        theme_dir.display()
    );
    Ok(files)
}

/// Expands descriptor resource globs relative to `project_root`.
///
/// Glob metacharacters in `project_root` itself match literally. Destinations keep the path relative to the project root. Directories
/// matched by a pattern are skipped.
pub fn collect_resources(project_root: &Path, patterns: &[String]) -> Result<Vec<DataFile>> {
    let mut files = Vec::new();
    let root = glob::Pattern::escape(&project_root.to_string_lossy());
    for pattern in patterns {
        let absolute = Path::new(&root).join(pattern);
        let absolute = absolute.to_string_lossy();
        for entry in glob::glob(&absolute)? {
            let path = entry.map_err(|e| Error::GenericError(e.to_string()))?;
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(project_root)?;
            files.push(DataFile {
                destination: to_destination(relative),
                source: path.clone(),
                kind: DataKind::Data,
            });
        }
    }
    Ok(files)
}

/// Registers extra binaries at the bundle root.
pub fn collect_binaries(binaries: &[PathBuf]) -> Result<Vec<DataFile>> {
    binaries
        .iter()
        .map(|path| {
            if !path.is_file() {
                return Err(Error::build_failure(format!(
                    "binary {} does not exist",
                    path.display()
                )));
            }
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("invalid binary path {}", path.display()))?;
            Ok(DataFile {
                destination: name.to_string(),
                source: path.clone(),
                kind: DataKind::Binary,
            })
        })
        .collect()
}

/// Fails when two entries share a destination.
///
/// Windows and macOS file systems ignore case, so destinations differing
/// only by case collide on those targets.
pub fn check_unique_destinations(files: &[DataFile], platform: Platform) -> Result<()> {
    let ignore_case = matches!(platform, Platform::Windows | Platform::MacOs);
    let mut seen: BTreeMap<String, &Path> = BTreeMap::new();
    for file in files {
        let key = if ignore_case {
            file.destination.to_lowercase()
        } else {
            file.destination.clone()
        };
        if let Some(previous) = seen.insert(key, &file.source) {
            return Err(Error::build_failure(format!(
                "duplicate data destination `{}` ({} and {})",
                file.destination,
                previous.display(),
                file.source.display()
            )));
        }
    }
    Ok(())
}

fn to_destination(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
