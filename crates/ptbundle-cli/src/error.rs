//! Error conversion utilities for CLI.
//!
//! Converts ptbundle-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use ptbundle_core::BundleError;

/// Converts `BundleError` to user-friendly anyhow error with context
pub fn convert_bundle_error(err: BundleError, name: &str) -> anyhow::Error {
    match err {
        BundleError::BaseDirNotFound { path } => {
            anyhow!(
                "Base directory not found: {}\n\
                 HINT: Use --base-dir to point at the plugin or theme project.",
                path.display()
            )
        }
        BundleError::StagingExists { path } => {
            anyhow!(
                "Staging directory for '{}' already exists: {}\n\
                 HINT: Another bundle run may be in progress, or an earlier run was killed. \
                 Remove the directory and try again.",
                name,
                path.display()
            )
        }
        BundleError::SourceNotFound { path } => {
            anyhow!(
                "Cannot bundle '{}': {} does not exist\n\
                 HINT: Paths given to --folder and --file are relative to the base directory.",
                name,
                path.display()
            )
        }
        BundleError::InvalidName { name, reason } => {
            anyhow!(
                "Invalid bundle name '{name}': {reason}\n\
                 HINT: The name is used as a directory and file name, e.g. 'my-plugin'."
            )
        }
        BundleError::Hook { hook, reason } => {
            anyhow!(
                "The {hook} command failed while bundling '{name}': {reason}\n\
                 HINT: Run the command by hand in the base directory to see why."
            )
        }
        BundleError::Io(io_err) => {
            anyhow!("I/O error while bundling '{name}': {io_err}")
        }
        _ => anyhow::Error::from(err).context(format!("Error bundling '{name}'")),
    }
}

/// Adds bundle context to a core result
pub fn add_bundle_context<T>(result: Result<T, BundleError>, name: &str) -> anyhow::Result<T> {
    result.map_err(|e| convert_bundle_error(e, name))
}
