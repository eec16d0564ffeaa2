//! File system utilities for bundling.
//!
//! Idempotent directory handling, file copies that create their parent
//! directories, and symlink-preserving tree copies.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Removes whatever is at `path` (file, symlink or directory tree).
pub async fn remove_path(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path).await {
        Ok(metadata) if metadata.is_dir() => remove_dir_all(path).await,
        Ok(_) => fs::remove_file(path)
            .await
            .fs_context("removing previous output", path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("inspecting previous output", path),
    }
}

/// Marks a file as executable (no-op on Windows hosts).
pub async fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .await
            .fs_context("setting executable permissions", path)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks on platforms that support them.
/// Fails if the source path is not a directory or doesn't exist.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a Directory")));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())?;
                if entry.path().is_dir() {
                    symlink_dir(&target, &dest_path)?;
                } else {
                    symlink_file(&target, &dest_path)?;
                }
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(dest_path)?;
            } else {
                std::fs::copy(entry.path(), dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_path_handles_files_dirs_and_absence() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out.exe");
        let folder = dir.path().join("out");
        std::fs::write(&file, b"x").unwrap();
        std::fs::create_dir_all(folder.join("nested")).unwrap();

        remove_path(&file).await.unwrap();
        remove_path(&folder).await.unwrap();
        remove_path(&dir.path().join("missing")).await.unwrap();

        assert!(!file.exists());
        assert!(!folder.exists());
    }

    #[tokio::test]
    async fn copy_dir_preserves_layout() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(src.join("Contents/MacOS")).unwrap();
        std::fs::write(src.join("Contents/MacOS/app"), b"bin").unwrap();

        let dst = dir.path().join("staging/App.app");
        copy_dir(&src, &dst).await.unwrap();
        assert_eq!(std::fs::read(dst.join("Contents/MacOS/app")).unwrap(), b"bin");
    }
}
