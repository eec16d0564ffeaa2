//! Command line argument parsing and validation.

use crate::bundler::Platform;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Packager for the Video Downloader desktop application
#[derive(Parser, Debug)]
#[command(
    name = "videodownloader-bundle",
    version,
    about = "Packages the Video Downloader GUI into a distributable for Windows, macOS or Linux",
    long_about = "Packages the Video Downloader GUI into a self-contained distributable.

Reads the build descriptor from [package.metadata.bundle], compiles the GUI
binary, harvests the theme files and emits a single executable (or folder),
wrapped in a .app bundle on macOS.

Usage:
  videodownloader-bundle build
  videodownloader-bundle build --platform macos --release-archive
  videodownloader-bundle build --onedir --skip-cargo-build
  videodownloader-bundle icon --out-dir .

Exit code 0 = every reported artifact exists."
)]
pub struct Args {
    /// Print progress details
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the distributable
    Build(BuildArgs),
    /// Generate icon.ico and icon.icns
    Icon(IconArgs),
}

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Cargo.toml holding the build descriptor
    #[arg(long, value_name = "PATH", default_value = "Cargo.toml")]
    pub manifest_path: PathBuf,

    /// Target platform: windows, macos or linux (default: host)
    #[arg(short, long, value_name = "PLATFORM")]
    pub platform: Option<Platform>,

    /// Emit a single self-extracting executable
    #[arg(long, conflicts_with = "onedir")]
    pub onefile: bool,

    /// Emit a folder holding the executable and its data files
    #[arg(long)]
    pub onedir: bool,

    /// Keep a console window attached (Windows)
    #[arg(long)]
    pub console: bool,

    /// Store the resource archive uncompressed
    #[arg(long)]
    pub no_compress: bool,

    /// Package the existing binary without running `cargo build`
    #[arg(long)]
    pub skip_cargo_build: bool,

    /// Prebuilt binary to package (implies --skip-cargo-build)
    #[arg(long, value_name = "PATH")]
    pub binary: Option<PathBuf>,

    /// Output directory (default: <project>/dist)
    #[arg(long, value_name = "DIR")]
    pub dist: Option<PathBuf>,

    /// Intermediate directory (default: <project>/build)
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Installed location of a styling library, bypassing `cargo metadata`
    #[arg(long = "library-path", value_name = "NAME=DIR", value_parser = parse_library_path)]
    pub library_paths: Vec<(String, PathBuf)>,

    /// Also produce a zip, dmg or tar.gz under <project>/release
    #[arg(long)]
    pub release_archive: bool,
}

impl BuildArgs {
    /// `Some` when the command line overrides the descriptor's `onefile`.
    pub fn onefile_override(&self) -> Option<bool> {
        if self.onefile {
            Some(true)
        } else if self.onedir {
            Some(false)
        } else {
            None
        }
    }

    pub fn console_override(&self) -> Option<bool> {
        self.console.then_some(true)
    }

    pub fn compress_override(&self) -> Option<bool> {
        self.no_compress.then_some(false)
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self
            .binary
            .as_ref()
            .is_some_and(|binary| binary.as_os_str().is_empty())
        {
            return Err("--binary cannot be empty".to_string());
        }
        for (name, dir) in &self.library_paths {
            if !dir.is_dir() {
                return Err(format!(
                    "--library-path {}={}: not a directory",
                    name,
                    dir.display()
                ));
            }
        }
        Ok(())
    }
}

#[derive(clap::Args, Debug)]
pub struct IconArgs {
    /// Directory the icons are written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,
}

fn parse_library_path(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((name, dir)) if !name.is_empty() && !dir.is_empty() => {
            Ok((name.to_string(), PathBuf::from(dir)))
        }
        _ => Err(format!("expected NAME=DIR, got `{value}`")),
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
