//! Default-allow staging: the whole project is mirrored, then pruned.

use crate::Result;
use crate::fs_ops;
use crate::staging::StagingStrategy;
use crate::staging::StagingTree;
use crate::staging::remove_matching;
use crate::types::BaseDir;

/// Mirrors the base directory and deletes everything matching an exclusion
/// pattern.
///
/// Exclusion patterns are resolved against the staging tree, never against
/// the project, so the source is left untouched.
///
/// # Examples
///
/// ```
/// use ptbundle_core::staging::DenyList;
///
/// let strategy = DenyList::new().with_exclude(vec!["node_modules".into(), "**/*.map".into()]);
/// assert_eq!(strategy.exclude().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DenyList {
    exclude: Vec<String>,
}

impl DenyList {
    /// Creates a deny-list that excludes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the exclusion patterns.
    #[must_use]
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Exclusion patterns.
    #[must_use]
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }
}

impl StagingStrategy for DenyList {
    fn assemble(&self, base: &BaseDir, staging: &StagingTree) -> Result<()> {
        fs_ops::mirror(base.as_path(), staging.path())?;
        let removed = remove_matching(staging.as_str(), &self.exclude)?;
        log::debug!("excluded {removed} paths from staging");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "deny-list"
    }
}
