//! Archive writing statistics.

use std::time::Duration;

/// Report of one directory-to-ZIP run.
///
/// # Examples
///
/// ```
/// use ptbundle_core::ArchiveReport;
///
/// let mut report = ArchiveReport::default();
/// report.files_added = 3;
/// report.directories_added = 2;
/// assert_eq!(report.total_entries(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Number of regular files written.
    pub files_added: usize,

    /// Number of explicit directory entries written, including the root.
    pub directories_added: usize,

    /// Total uncompressed bytes written.
    pub bytes_written: u64,

    /// Entries that were neither files nor directories (sockets, dangling links).
    pub entries_skipped: usize,

    /// Duration of the archive run.
    pub duration: Duration,

    /// Warnings generated while walking the tree.
    pub warnings: Vec<String>,
}

impl ArchiveReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries in the archive.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_added + self.directories_added
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
