//! Linux release archive: `release/<Name>-Linux.tar.gz`.

use crate::bundler::{Error, Result, error::Context, error::ErrorExt, settings::Settings};
use flate2::{Compression, write::GzEncoder};
use std::path::{Path, PathBuf};

/// Packs the emitted executable (or folder) into a gzip tarball.
pub async fn create_tarball(settings: &Settings, output: &Path) -> Result<PathBuf> {
    let release_dir = settings.release_dir().to_path_buf();
    tokio::fs::create_dir_all(&release_dir)
        .await
        .fs_context("creating release directory", &release_dir)?;

    let tarball = release_dir.join(format!(
        "{}-{}.tar.gz",
        settings.product_name(),
        settings.platform().release_label()
    ));

    let source = output.to_path_buf();
    let target = tarball.clone();
    tokio::task::spawn_blocking(move || write_tarball(&source, &target))
        .await
        .map_err(|e| Error::GenericError(format!("Tarball task panicked: {}", e)))??;

    log::info!("✓ Created release archive: {}", tarball.display());
    Ok(tarball)
}

fn write_tarball(source: &Path, target: &Path) -> Result<()> {
    let name = source
        .file_name()
        .context("invalid output path")?
        .to_os_string();

    let file = std::fs::File::create(target).fs_context("creating release archive", target)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    if source.is_dir() {
        builder
            .append_dir_all(&name, source)
            .fs_context("archiving folder build", source)?;
    } else {
        builder
            .append_path_with_name(source, &name)
            .fs_context("archiving executable", source)?;
    }
    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .fs_context("finishing release archive", target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;

    #[test]
    fn tarball_holds_executable_under_its_name() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("VideoDownloader");
        std::fs::write(&exe, b"binary").unwrap();
        let tarball = dir.path().join("out.tar.gz");

        write_tarball(&exe, &tarball).unwrap();

        let file = std::fs::File::open(&tarball).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["VideoDownloader".to_string()]);
    }
}
