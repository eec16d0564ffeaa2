//! Command line interface for the packager.
//!
//! Parses arguments, dispatches to the `build` and `icon` commands and
//! turns failures into a non-zero exit code.

pub mod args;
pub mod commands;
mod output;

pub use args::{Args, BuildArgs, Command, IconArgs, RuntimeConfig};
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
///
/// Returns the process exit code.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let runtime_config = RuntimeConfig::from(&args);

    let result = match &args.command {
        Command::Build(build) => commands::build(build, &runtime_config).await,
        Command::Icon(icon) => commands::icon(icon, &runtime_config),
    };

    match result {
        Ok(code) => Ok(code),
        Err(e) => {
            runtime_config.output().error(&e.to_string())?;
            for suggestion in e.recovery_suggestions() {
                runtime_config.indent(&suggestion)?;
            }
            Ok(1)
        }
    }
}
