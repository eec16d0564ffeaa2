//! Errors raised while a packaged application starts.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to prepare the packaged application's resources.
#[derive(Debug, Error)]
pub enum StartupError {
    /// A hidden import declared at build time is not part of this binary.
    #[error(
        "module `{module}` was declared as a hidden import but is not available in this build \
         (hidden import list v{declared_version}, runtime registry v{runtime_version})"
    )]
    UnresolvedModule {
        module: String,
        declared_version: u32,
        runtime_version: u32,
    },

    /// The appended resource archive is truncated or malformed.
    #[error("corrupt resource payload in {}: {reason}", path.display())]
    CorruptPayload { path: PathBuf, reason: String },

    #[error("invalid bundle manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context} ({}): {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no cache directory available for resource extraction")]
    NoCacheDir,
}

impl StartupError {
    pub(crate) fn io(
        context: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            context,
            path,
            source,
        }
    }
}
