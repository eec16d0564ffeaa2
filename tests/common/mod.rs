//! Shared project scaffolding for the packager integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const THEMES: [&str; 3] = ["dark_teal.xml", "light_blue.xml", "dark_amber.xml"];

/// A throwaway project: the fixture manifest and entry point, a fake styling
/// library and a fake prebuilt binary.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
        std::fs::copy(fixtures.join("Cargo.toml"), dir.path().join("Cargo.toml")).unwrap();
        std::fs::create_dir_all(dir.path().join("src/bin")).unwrap();
        std::fs::copy(
            fixtures.join("src/bin/video-downloader.rs"),
            dir.path().join("src/bin/video-downloader.rs"),
        )
        .unwrap();

        let themes = dir.path().join("lib/qt_material/themes");
        std::fs::create_dir_all(themes.join("nested")).unwrap();
        for name in THEMES {
            std::fs::write(themes.join(name), format!("<resources name=\"{name}\"/>")).unwrap();
        }
        std::fs::write(themes.join("README.txt"), "not a theme").unwrap();
        std::fs::write(themes.join("nested/inner.xml"), "<resources/>").unwrap();

        std::fs::create_dir_all(dir.path().join("prebuilt")).unwrap();
        std::fs::write(dir.path().join("prebuilt/video-downloader"), b"#!/bin/sh\necho mock\n")
            .unwrap();

        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn manifest(&self) -> PathBuf {
        self.root().join("Cargo.toml")
    }

    pub fn library_root(&self) -> PathBuf {
        self.root().join("lib/qt_material")
    }

    pub fn binary(&self) -> PathBuf {
        self.root().join("prebuilt/video-downloader")
    }

    pub fn dist(&self) -> PathBuf {
        self.root().join("dist")
    }

    pub fn work(&self) -> PathBuf {
        self.root().join("build")
    }

    pub fn remove_entry_point(&self) {
        std::fs::remove_file(self.root().join("src/bin/video-downloader.rs")).unwrap();
    }
}
