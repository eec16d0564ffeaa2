//! Emit step: the runnable platform binary.
//!
//! Onefile builds append the resource archive and a trailer to the compiled
//! binary; folder builds lay the binary, the data files and the manifest out
//! in `<dist>/<Name>/`.

use super::{BuildWarning, archive::Archive};
use crate::{
    bundler::{
        DataFile, DataKind, PackageType, Platform, Result, error::ErrorExt, platform::windows::pe,
        settings::Settings, utils::fs,
    },
    runtime::{MANIFEST_FILE, PayloadTrailer},
};
use std::path::{Path, PathBuf};

/// The emitted binary (or folder) and where its executable lives.
#[derive(Clone, Debug)]
pub struct Emitted {
    pub package_type: PackageType,
    /// Onefile: the executable. Folder: the folder.
    pub path: PathBuf,
    /// The executable inside `path` (equal to `path` for onefile builds).
    pub executable: PathBuf,
}

/// Writes the platform binary into the dist directory.
pub async fn emit(
    settings: &Settings,
    binary: &Path,
    archive: &Archive,
    files: &[DataFile],
    warnings: &mut Vec<BuildWarning>,
) -> Result<Emitted> {
    let mut image = tokio::fs::read(binary)
        .await
        .fs_context("reading compiled binary", binary)?;

    if settings.platform() == Platform::Windows {
        let subsystem = settings.subsystem();
        if pe::set_subsystem(&mut image, subsystem) {
            log::debug!("PE subsystem set to {:?}", subsystem);
        } else {
            let warning = BuildWarning::NotPortableExecutable {
                path: binary.to_path_buf(),
            };
            log::warn!("{}", warning);
            warnings.push(warning);
        }
    }

    tokio::fs::create_dir_all(settings.dist_dir())
        .await
        .fs_context("creating dist directory", settings.dist_dir())?;

    if settings.onefile() {
        emit_onefile(settings, image, archive).await
    } else {
        emit_folder(settings, image, archive, files).await
    }
}

async fn emit_onefile(
    settings: &Settings,
    mut image: Vec<u8>,
    archive: &Archive,
) -> Result<Emitted> {
    let output = settings.dist_dir().join(settings.executable_name());
    fs::remove_path(&output).await?;

    let payload = tokio::fs::read(&archive.path)
        .await
        .fs_context("reading resource archive", &archive.path)?;
    let trailer = PayloadTrailer::new(payload.len() as u64, archive.compressed);
    image.extend_from_slice(&payload);
    image.extend_from_slice(&trailer.to_bytes());

    tokio::fs::write(&output, &image)
        .await
        .fs_context("writing executable", &output)?;
    fs::set_executable(&output).await?;

    log::info!("✓ Created executable: {}", output.display());
    Ok(Emitted {
        package_type: PackageType::Executable,
        path: output.clone(),
        executable: output,
    })
}

async fn emit_folder(
    settings: &Settings,
    image: Vec<u8>,
    archive: &Archive,
    files: &[DataFile],
) -> Result<Emitted> {
    let folder = settings.dist_dir().join(settings.product_name());
    fs::remove_path(&folder).await?;
    fs::create_dir_all(&folder, false).await?;

    let executable = folder.join(settings.executable_name());
    tokio::fs::write(&executable, &image)
        .await
        .fs_context("writing executable", &executable)?;
    fs::set_executable(&executable).await?;

    copy_data_files(files, &folder).await?;
    fs::copy_file(&archive.manifest_path, &folder.join(MANIFEST_FILE)).await?;

    log::info!("✓ Created folder build: {}", folder.display());
    Ok(Emitted {
        package_type: PackageType::Folder,
        path: folder,
        executable,
    })
}

/// Copies data files below `root`, keeping their destinations.
pub async fn copy_data_files(files: &[DataFile], root: &Path) -> Result<()> {
    for file in files {
        let target = root.join(&file.destination);
        fs::copy_file(&file.source, &target).await?;
        if file.kind == DataKind::Binary {
            fs::set_executable(&target).await?;
        }
    }
    Ok(())
}
