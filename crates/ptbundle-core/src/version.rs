//! Version string resolution.
//!
//! The pipeline asks a [`VersionSource`] once per run. Whatever it returns is
//! normalized by [`resolve_version`]: a missing or empty answer becomes
//! [`DEFAULT_VERSION`] and one leading `v`/`V` is dropped.

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

/// Version used when no source can provide one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Supplies the raw version string for a bundle.
pub trait VersionSource {
    /// Returns the most recent descriptive tag, or `None` if unavailable.
    fn describe(&self) -> Option<String>;
}

/// Reads the version from `git describe` in a repository directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitDescribe {
    dir: PathBuf,
}

impl GitDescribe {
    /// Creates a source that runs git inside `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the repository directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl VersionSource for GitDescribe {
    fn describe(&self) -> Option<String> {
        let output = match Command::new("git")
            .arg("describe")
            .current_dir(&self.dir)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                log::debug!("failed to run git: {e}");
                return None;
            }
        };

        if !output.status.success() {
            log::debug!(
                "git describe failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .map(|line| line.trim().to_owned())
    }
}

/// A version known up front, e.g. from a release script.
///
/// # Examples
///
/// ```
/// use ptbundle_core::FixedVersion;
/// use ptbundle_core::VersionSource;
///
/// assert_eq!(FixedVersion::new("v2.0.1").describe().as_deref(), Some("v2.0.1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedVersion(String);

impl FixedVersion {
    /// Wraps `version`.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }
}

impl VersionSource for FixedVersion {
    fn describe(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Resolves the version string a bundle is tagged with.
///
/// # Examples
///
/// ```
/// use ptbundle_core::FixedVersion;
/// use ptbundle_core::version::resolve_version;
///
/// assert_eq!(resolve_version(&FixedVersion::new("v1.2.3")), "1.2.3");
/// assert_eq!(resolve_version(&FixedVersion::new("")), "1.0.0");
/// ```
#[must_use]
pub fn resolve_version(source: &dyn VersionSource) -> String {
    match source.describe() {
        Some(raw) if !raw.is_empty() => strip_version_prefix(&raw).to_owned(),
        _ => {
            log::debug!("no version available, using {DEFAULT_VERSION}");
            DEFAULT_VERSION.to_owned()
        }
    }
}

/// Drops exactly one leading `v` or `V`.
#[must_use]
pub fn strip_version_prefix(version: &str) -> &str {
    version
        .strip_prefix(['v', 'V'])
        .unwrap_or(version)
}
