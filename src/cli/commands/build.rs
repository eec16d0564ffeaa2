//! `build` command: descriptor → settings → bundle → report.

use crate::bundler::{BuildReport, Bundler, SettingsBuilder, StaticResolver};
use crate::cli::{RuntimeConfig, args::BuildArgs};
use crate::error::{BundlerError, CliError, Result};
use crate::metadata::load_manifest;

/// Runs a build and prints the produced artifacts.
///
/// Returns the process exit code. Exit code 0 guarantees that every listed
/// artifact exists.
pub async fn build(args: &BuildArgs, runtime_config: &RuntimeConfig) -> Result<i32> {
    args.validate()
        .map_err(|reason| BundlerError::Cli(CliError::InvalidArguments { reason }))?;

    runtime_config.verbose_println(&format!(
        "Reading build descriptor from {}",
        args.manifest_path.display()
    ))?;
    let manifest = load_manifest(&args.manifest_path)?;

    let mut builder = SettingsBuilder::new()
        .project_root(&manifest.project_root)
        .package_settings(manifest.package)
        .bundle_settings(manifest.bundle_settings)
        .release_archive(args.release_archive);

    if let Some(platform) = args.platform {
        builder = builder.platform(platform);
    }
    if let Some(binary) = &args.binary {
        builder = builder.binary_path(binary);
    }
    if args.skip_cargo_build {
        builder = builder.compile(false);
    }
    if let Some(dist) = &args.dist {
        builder = builder.dist_dir(dist);
    }
    if let Some(work_dir) = &args.work_dir {
        builder = builder.work_dir(work_dir);
    }
    if let Some(onefile) = args.onefile_override() {
        builder = builder.onefile(onefile);
    }
    if let Some(console) = args.console_override() {
        builder = builder.console(console);
    }
    if let Some(compress) = args.compress_override() {
        builder = builder.compress(compress);
    }

    let settings = builder.build()?;
    runtime_config.progress(&format!(
        "Building {} {} for {}",
        settings.product_name(),
        settings.version_string(),
        settings.platform()
    ))?;

    let bundler = if args.library_paths.is_empty() {
        Bundler::new(settings)
    } else {
        let resolver = args
            .library_paths
            .iter()
            .fold(StaticResolver::new(), |resolver, (name, dir)| {
                resolver.with(name.clone(), dir.clone())
            });
        Bundler::with_resolver(settings, resolver)
    };

    let report = bundler.bundle().await?;
    print_report(&report, runtime_config)?;
    Ok(0)
}

fn print_report(report: &BuildReport, runtime_config: &RuntimeConfig) -> Result<()> {
    for warning in &report.warnings {
        runtime_config.warn(&warning.to_string())?;
    }

    runtime_config.section("Artifacts")?;
    for artifact in &report.artifacts {
        for path in &artifact.paths {
            runtime_config.success(&format!("{}: {}", artifact.package_type, path.display()))?;
        }
        runtime_config.indent(&format!("size:   {} bytes", artifact.size))?;
        runtime_config.indent(&format!("sha256: {}", artifact.checksum))?;
    }

    if runtime_config.output().is_verbose() {
        runtime_config.section("Bundled data")?;
        for file in &report.data_files {
            runtime_config.indent(&format!(
                "{} <- {}",
                file.destination,
                file.source.display()
            ))?;
        }
        match &report.icon {
            Some(icon) => runtime_config.indent(&format!("icon: {}", icon.display()))?,
            None => runtime_config.indent("icon: none")?,
        }
    }
    Ok(())
}
