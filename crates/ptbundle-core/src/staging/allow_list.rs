//! Default-deny staging: only named folders and files are copied.

use crate::Result;
use crate::fs_ops;
use crate::staging::StagingStrategy;
use crate::staging::StagingTree;
use crate::types::BaseDir;
use std::path::Path;

/// Copies an explicit list of folders and files into the staging tree.
///
/// Entries are project-relative paths (`./`, `/` or bare), not glob
/// patterns. Each one lands at the same relative path inside the staging
/// tree.
///
/// # Examples
///
/// ```
/// use ptbundle_core::staging::AllowList;
///
/// let strategy = AllowList::new()
///     .with_folders(vec!["dist".into(), "src".into()])
///     .with_files(vec!["my-plugin.php".into(), "readme.txt".into()]);
/// assert_eq!(strategy.folders().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    folders: Vec<String>,
    files: Vec<String>,
}

impl AllowList {
    /// Creates an empty allow-list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the folders to mirror.
    #[must_use]
    pub fn with_folders(mut self, folders: Vec<String>) -> Self {
        self.folders = folders;
        self
    }

    /// Sets the files to copy.
    #[must_use]
    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }

    /// Folders mirrored into the staging tree.
    #[must_use]
    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    /// Files copied into the staging tree.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }
}

impl StagingStrategy for AllowList {
    fn assemble(&self, base: &BaseDir, staging: &StagingTree) -> Result<()> {
        for folder in &self.folders {
            let source = base.resolve(folder);
            let target = staging.resolve(folder);
            fs_ops::mirror(Path::new(&source), Path::new(&target))?;
        }

        for file in &self.files {
            let source = base.resolve(file);
            let target = staging.resolve(file);
            fs_ops::copy_file(Path::new(&source), Path::new(&target))?;
        }

        log::debug!(
            "staged {} folders and {} files",
            self.folders.len(),
            self.files.len()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "allow-list"
    }
}
