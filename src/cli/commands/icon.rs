//! `icon` command: writes the application icons.

use crate::bundler::resources::icons::generate_icons;
use crate::cli::{RuntimeConfig, args::IconArgs};
use crate::error::Result;

pub fn icon(args: &IconArgs, runtime_config: &RuntimeConfig) -> Result<i32> {
    for path in generate_icons(&args.out_dir)? {
        runtime_config.success(&format!("Created {}", path.display()))?;
    }
    Ok(0)
}
