//! Summary of a completed bundle run.

use crate::ArchiveReport;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of [`Bundler::run`](crate::Bundler::run).
///
/// Both archives are written from the same staging snapshot, so a single
/// [`ArchiveReport`] (of the versioned archive) describes both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleReport {
    /// Resolved version string, without a leading `v`.
    pub version: String,

    /// Path of `{ptname}.{version}.zip`.
    pub versioned_archive: PathBuf,

    /// Path of `{ptname}.zip`.
    pub unversioned_archive: PathBuf,

    /// Marker file naming the versioned archive.
    pub versioned_marker: PathBuf,

    /// Marker file naming the unversioned archive.
    pub unversioned_marker: PathBuf,

    /// Statistics of the archive contents.
    pub archive: ArchiveReport,

    /// Paths removed from the base directory before the build hook.
    pub cleaned_before: usize,

    /// Paths removed from the base directory after the build hook.
    pub cleaned_after: usize,

    /// Paths removed from the staging tree.
    pub cleaned_archive: usize,

    /// Whether the entry file was found and rewritten.
    pub version_injected: bool,

    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl BundleReport {
    /// Returns the two archive paths, versioned first.
    #[must_use]
    pub fn archives(&self) -> [&PathBuf; 2] {
        [&self.versioned_archive, &self.unversioned_archive]
    }

    /// Total number of paths removed by the three cleanup passes.
    #[must_use]
    pub fn total_cleaned(&self) -> usize {
        self.cleaned_before + self.cleaned_after + self.cleaned_archive
    }
}
