//! Intermediate resource archive.
//!
//! Every data file plus the generated `bundle-manifest.json` goes into one
//! tar stream, written to `<work>/<Name>/<Name>.pkg`. Entries are sorted by
//! destination and carry zeroed timestamps and owners, so identical inputs
//! give identical archives.

use crate::{
    bundler::{
        DataFile, DataKind, Error, Result,
        error::{Context, ErrorExt},
        settings::Settings,
        utils::fs,
    },
    runtime::{BundleManifest, HIDDEN_IMPORTS_VERSION, MANIFEST_FILE, ManifestEntry},
};
use flate2::{Compression, write::GzEncoder};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

/// Paths of the archive step's outputs.
#[derive(Clone, Debug)]
pub struct Archive {
    /// `<work>/<Name>/<Name>.pkg`
    pub path: PathBuf,
    /// `<work>/<Name>/bundle-manifest.json`
    pub manifest_path: PathBuf,
    pub compressed: bool,
}

/// Builds the manifest recorded in the archive.
pub fn build_manifest(settings: &Settings, files: &[DataFile]) -> BundleManifest {
    let mut data_files: Vec<ManifestEntry> = files
        .iter()
        .map(|file| ManifestEntry {
            destination: file.destination.clone(),
            kind: file.kind,
        })
        .collect();
    data_files.sort_by(|a, b| a.destination.cmp(&b.destination));

    BundleManifest {
        name: settings.product_name().to_string(),
        version: settings.version_string().to_string(),
        hidden_imports_version: HIDDEN_IMPORTS_VERSION,
        hidden_imports: settings.hidden_imports().to_vec(),
        data_files,
        console: settings.console(),
    }
}

/// Writes the manifest and the archive into the work directory.
///
/// Any previous work directory of the same name is replaced.
pub async fn write_archive(
    settings: &Settings,
    files: &[DataFile],
    manifest: &BundleManifest,
) -> Result<Archive> {
    let work = settings.work_dir().join(settings.product_name());
    fs::create_dir_all(&work, true).await?;

    let manifest_path = work.join(MANIFEST_FILE);
    let manifest_json = manifest.to_json()?;
    tokio::fs::write(&manifest_path, &manifest_json)
        .await
        .fs_context("writing bundle manifest", &manifest_path)?;

    let path = work.join(format!("{}.pkg", settings.product_name()));
    let compressed = settings.compress();

    let mut sorted = files.to_vec();
    sorted.sort_by(|a, b| a.destination.cmp(&b.destination));
    let archive_path = path.clone();
    tokio::task::spawn_blocking(move || {
        write_tar(&archive_path, &sorted, manifest_json.as_bytes(), compressed)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Archive task panicked: {}", e)))??;

    log::info!(
        "✓ Created resource archive: {} ({} file(s){})",
        path.display(),
        files.len(),
        if compressed { ", compressed" } else { "" }
    );

    Ok(Archive {
        path,
        manifest_path,
        compressed,
    })
}

fn write_tar(path: &Path, files: &[DataFile], manifest: &[u8], compress: bool) -> Result<()> {
    let file = std::fs::File::create(path).fs_context("creating archive", path)?;

    if compress {
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        append_all(&mut builder, files, manifest)?;
        let encoder = builder.into_inner().fs_context("finishing archive", path)?;
        encoder.finish().fs_context("finishing archive", path)?;
    } else {
        let mut builder = tar::Builder::new(file);
        append_all(&mut builder, files, manifest)?;
        let mut file = builder.into_inner().fs_context("finishing archive", path)?;
        file.flush().fs_context("finishing archive", path)?;
    }
    Ok(())
}

fn append_all<W: Write>(
    builder: &mut tar::Builder<W>,
    files: &[DataFile],
    manifest: &[u8],
) -> Result<()> {
    for file in files {
        let data = std::fs::read(&file.source).fs_context("reading data file", &file.source)?;
        let mode = match file.kind {
            DataKind::Binary => 0o755,
            DataKind::Data => 0o644,
        };
        append_entry(builder, &file.destination, &data, mode)
            .with_context(|| format!("archiving {}", file.destination))?;
    }
    append_entry(builder, MANIFEST_FILE, manifest, 0o644).context("archiving manifest")?;
    Ok(())
}

fn append_entry<W: Write>(
    builder: &mut tar::Builder<W>,
    destination: &str,
    data: &[u8],
    mode: u32,
) -> std::io::Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(data.len() as u64);
    header.set_mode(mode);
    header.set_mtime(0);
    header.set_uid(0);
    header.set_gid(0);
    builder.append_data(&mut header, destination, data)
}
