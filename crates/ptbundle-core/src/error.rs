//! Error types for bundle operations.

use crate::hooks::HookKind;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `BundleError`.
pub type Result<T> = std::result::Result<T, BundleError>;

/// Errors that can occur while assembling or archiving a bundle.
#[derive(Error, Debug)]
pub enum BundleError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The ZIP writer rejected an entry or failed to finalize the archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Base directory does not exist.
    #[error("base directory does not exist: {path}")]
    BaseDirNotFound {
        /// The configured base directory.
        path: PathBuf,
    },

    /// Path exists but is not a directory.
    #[error("path is not a directory: {path}")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// Path cannot be represented as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// Bundle name cannot be used as a staging directory or archive name.
    #[error("invalid bundle name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// The staging directory is already present before staging begins.
    #[error("staging directory already exists: {path}")]
    StagingExists {
        /// Staging directory path.
        path: PathBuf,
    },

    /// An explicitly included file or folder does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// A caller-supplied hook failed.
    #[error("{hook} hook failed: {reason}")]
    Hook {
        /// Which hook failed.
        hook: HookKind,
        /// Failure message reported by the hook.
        reason: String,
    },
}

impl BundleError {
    /// Returns `true` if this error was raised by a build or cleanup hook.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptbundle_core::BundleError;
    /// use ptbundle_core::HookKind;
    ///
    /// let err = BundleError::Hook {
    ///     hook: HookKind::Build,
    ///     reason: "npm exited with 1".into(),
    /// };
    /// assert!(err.is_hook_failure());
    /// ```
    #[must_use]
    pub const fn is_hook_failure(&self) -> bool {
        matches!(self, Self::Hook { .. })
    }

    /// Returns the filesystem path this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::BaseDirNotFound { path }
            | Self::NotADirectory { path }
            | Self::NonUtf8Path { path }
            | Self::StagingExists { path }
            | Self::SourceNotFound { path } => Some(path),
            _ => None,
        }
    }
}
