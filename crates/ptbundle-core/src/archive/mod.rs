//! Serializing a staging directory into a ZIP container.

pub mod report;
pub mod zip;

pub use report::ArchiveReport;
pub use self::zip::archive_directory;
