//! Error type for the packaging pipeline.
//!
//! Every fatal build condition maps to one variant of [`Error`]. Non-fatal
//! conditions (a configured icon that does not exist) are reported as
//! [`BuildWarning`](crate::bundler::BuildWarning)s instead.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building a distributable.
#[derive(Debug, Error)]
pub enum Error {
    /// The build cannot produce its output (missing entry point or binary,
    /// colliding destinations, unwritable archive).
    #[error("build failed: {0}")]
    BuildFailure(String),

    /// A module or library could not be located.
    #[error("could not resolve module `{module}`: {reason}")]
    ModuleResolution {
        /// Module or library name
        module: String,
        /// Why resolution failed
        reason: String,
    },

    /// A version string is not a dotted numeric version.
    #[error("invalid version `{0}`: expected dotted numeric components such as 1.0.0")]
    InvalidVersion(String),

    /// A bundle identifier is missing or not in reverse-domain form.
    #[error("invalid bundle identifier `{0}`: expected reverse-domain form such as com.example.app")]
    InvalidIdentifier(String),

    /// An I/O error annotated with the operation and the path involved.
    #[error("{context} ({}): {source}", path.display())]
    Fs {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An error annotated with a free-form context message.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    #[error(transparent)]
    StripPrefix(#[from] std::path::StripPrefixError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Plist(#[from] plist::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Glob(#[from] glob::PatternError),

    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Shorthand for [`Error::BuildFailure`].
    pub fn build_failure(reason: impl Into<String>) -> Self {
        Self::BuildFailure(reason.into())
    }

    /// Shorthand for [`Error::ModuleResolution`].
    pub fn module_resolution(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ModuleResolution {
            module: module.into(),
            reason: reason.into(),
        }
    }
}

/// Attaches a context message to a failure.
pub trait Context<T> {
    /// Wraps the error (or `None`) with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Lazily evaluated variant of [`Context::context`].
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|source| Error::Context {
            context: context.to_string(),
            source: Box::new(source),
        })
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|source| Error::Context {
            context: f().to_string(),
            source: Box::new(source),
        })
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Annotates I/O failures with the path they concern.
pub trait ErrorExt<T> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_names_the_path() {
        let err: Result<()> = Err(std::io::Error::from(std::io::ErrorKind::NotFound))
            .fs_context("reading entry point", "/nowhere/main.rs");
        let message = err.unwrap_err().to_string();
        assert!(message.starts_with("reading entry point (/nowhere/main.rs)"));
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let err = None::<u8>.context("no main binary").unwrap_err();
        assert_eq!(err.to_string(), "no main binary");
    }
}
