//! Error types for the packager command line.

use thiserror::Error;

/// Result type alias for packager commands
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Top-level error of a packager command
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Build descriptor errors
    #[error("invalid [package.metadata.bundle]: {0}")]
    Toml(#[from] toml::de::Error),

    /// Build failures
    #[error("Build failed: {0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Suggestions printed below the error message
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error;
        match self {
            Self::Bundler(Error::ModuleResolution { module, .. }) => vec![
                format!("Add `{module}` to [dependencies] so `cargo metadata` can locate it"),
                format!("Or point at an installed copy with --library-path {module}=DIR"),
            ],
            Self::Bundler(Error::InvalidIdentifier(_)) => vec![
                "Set identifier = \"com.example.app\" in [package.metadata.bundle]".to_string(),
            ],
            Self::Bundler(Error::InvalidVersion(_)) => {
                vec!["Versions must be dotted numbers such as 1.0.0".to_string()]
            }
            Self::Toml(_) => vec!["Check the [package.metadata.bundle] table".to_string()],
            _ => Vec::new(),
        }
    }
}
