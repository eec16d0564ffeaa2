//! Windows release archive: `release/<Name>-Windows.zip`.

use crate::bundler::{
    Error, Result,
    error::{Context, ErrorExt},
    settings::Settings,
};
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Files copied from the project root into the release when present.
const EXTRA_FILES: [&str; 2] = ["README.md", "LICENSE"];

/// Zips the emitted executable (or folder) with README and LICENSE.
pub async fn create_zip(settings: &Settings, output: &Path) -> Result<PathBuf> {
    let release_dir = settings.release_dir().to_path_buf();
    tokio::fs::create_dir_all(&release_dir)
        .await
        .fs_context("creating release directory", &release_dir)?;

    let zip_path = release_dir.join(format!(
        "{}-{}.zip",
        settings.product_name(),
        settings.platform().release_label()
    ));

    let mut entries = collect_entries(output)?;
    for extra in EXTRA_FILES {
        let path = settings.project_root().join(extra);
        if path.is_file() {
            entries.push((extra.to_string(), path));
        }
    }

    let target = zip_path.clone();
    tokio::task::spawn_blocking(move || write_zip(&target, &entries))
        .await
        .map_err(|e| Error::GenericError(format!("Zip task panicked: {}", e)))??;

    log::info!("✓ Created release archive: {}", zip_path.display());
    Ok(zip_path)
}

/// Archive names and sources for the emitted output.
fn collect_entries(output: &Path) -> Result<Vec<(String, PathBuf)>> {
    let name = output
        .file_name()
        .and_then(|n| n.to_str())
        .context("invalid output path")?
        .to_string();

    if output.is_file() {
        return Ok(vec![(name, output.to_path_buf())]);
    }

    let mut entries = Vec::new();
    let base = output.parent().unwrap_or(output);
    let mut walk: Vec<_> = walkdir::WalkDir::new(output)
        .into_iter()
        .collect::<std::result::Result<_, _>>()?;
    walk.sort_by(|a: &walkdir::DirEntry, b| a.path().cmp(b.path()));
    for entry in walk {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(base)?;
        let archive_name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        entries.push((archive_name, entry.path().to_path_buf()));
    }
    Ok(entries)
}

fn write_zip(path: &Path, entries: &[(String, PathBuf)]) -> Result<()> {
    let file = std::fs::File::create(path).fs_context("creating release archive", path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);

    for (name, source) in entries {
        zip.start_file(name.as_str(), options)?;
        let data = std::fs::read(source).fs_context("reading release file", source)?;
        zip.write_all(&data)
            .fs_context("writing release archive", path)?;
    }
    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_entries_keep_folder_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("VideoDownloader");
        std::fs::create_dir_all(folder.join("qt_material")).unwrap();
        std::fs::write(folder.join("VideoDownloader.exe"), b"exe").unwrap();
        std::fs::write(folder.join("qt_material/dark_teal.xml"), b"<resources/>").unwrap();

        let names: Vec<String> = collect_entries(&folder)
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec![
                "VideoDownloader/VideoDownloader.exe".to_string(),
                "VideoDownloader/qt_material/dark_teal.xml".to_string(),
            ]
        );
    }
}
