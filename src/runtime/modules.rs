//! Registry of GUI runtime modules compiled into the application.
//!
//! The build descriptor's `hidden_imports` list names modules the packaged
//! binary must provide. The list is maintained by hand; a name that is not
//! in [`REGISTRY`] is accepted at build time and only rejected here, when the
//! packaged application starts.

use super::{BundleManifest, StartupError};

/// Version of the hidden-import list format and registry contents.
///
/// Bump whenever a module is added to or removed from [`REGISTRY`].
pub const HIDDEN_IMPORTS_VERSION: u32 = 1;

/// Modules this build of the application provides.
pub const REGISTRY: &[&str] = &[
    "eframe.glow",
    "eframe.winit",
    "egui.widgets",
    "egui.containers",
    "egui.style",
    "egui.text",
    "rfd.dialog",
    "image.codecs",
    "reqwest.blocking",
    "qt_material.themes",
];

/// Returns true when `module` is provided by this build.
pub fn is_available(module: &str) -> bool {
    REGISTRY.contains(&module)
}

/// Checks every hidden import of `manifest` against the registry.
///
/// # Errors
///
/// [`StartupError::UnresolvedModule`] for the first name the registry does
/// not contain.
pub fn verify_hidden_imports(manifest: &BundleManifest) -> Result<(), StartupError> {
    if manifest.hidden_imports_version != HIDDEN_IMPORTS_VERSION {
        log::warn!(
            "Bundle was built against hidden import list v{}, runtime registry is v{}",
            manifest.hidden_imports_version,
            HIDDEN_IMPORTS_VERSION
        );
    }

    for module in &manifest.hidden_imports {
        if !is_available(module) {
            return Err(StartupError::UnresolvedModule {
                module: module.clone(),
                declared_version: manifest.hidden_imports_version,
                runtime_version: HIDDEN_IMPORTS_VERSION,
            });
        }
        log::debug!("Hidden import {} resolved", module);
    }
    Ok(())
}
