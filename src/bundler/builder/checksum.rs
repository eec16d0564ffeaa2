//! Artifact checksum calculation.
//!
//! SHA-256 of single files (executables, archives) and of directory trees
//! (folder builds, `.app` bundles).

use crate::{
    bail,
    bundler::{Result, error::ErrorExt},
};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates the hex SHA-256 of a file or directory tree.
///
/// Directory trees are hashed file by file in sorted path order; each file
/// contributes its relative path followed by its content, so the digest
/// changes when files move as well as when they change.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;

    let mut hasher = Sha256::new();
    if metadata.is_file() {
        hash_file(&mut hasher, path).await?;
    } else if metadata.is_dir() {
        let mut entries: Vec<_> = walkdir::WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .collect();
        entries.sort_by(|a, b| a.path().cmp(b.path()));

        for entry in entries {
            let relative = entry.path().strip_prefix(path)?;
            hasher.update(relative.to_string_lossy().as_bytes());
            hash_file(&mut hasher, entry.path()).await?;
        }
    } else {
        bail!("Path is neither file nor directory: {}", path.display())
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Feeds a file into `hasher` in 8KB chunks.
async fn hash_file(hasher: &mut Sha256, path: &Path) -> Result<()> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(())
}
