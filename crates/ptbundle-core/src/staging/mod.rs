//! Assembling the staging tree.
//!
//! A [`StagingStrategy`] decides what part of the project reaches the staging
//! tree. [`AllowList`] copies only what it names, [`DenyList`] mirrors the
//! whole project and then deletes what it names.

pub mod allow_list;
pub mod deny_list;
pub mod tree;

pub use allow_list::AllowList;
pub use deny_list::DenyList;
pub use tree::StagingTree;

use crate::Result;
use crate::fs_ops;
use crate::glob::globstar;
use crate::glob::matcher::escape;
use crate::types::BaseDir;
use crate::types::join_relative;
use crate::types::strip_relative_prefix;
use std::fmt;

/// Policy for populating a freshly created staging tree from the base
/// directory.
pub trait StagingStrategy: fmt::Debug {
    /// Copies the selected parts of `base` into `staging`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured source is missing or a filesystem
    /// operation fails.
    fn assemble(&self, base: &BaseDir, staging: &StagingTree) -> Result<()>;

    /// Short policy name for logs and reports.
    fn name(&self) -> &'static str;
}

/// Deletes every existing path matching any of `patterns` under `root`.
///
/// Patterns are anchored to `root` (taken literally, even if it contains
/// wildcard characters) and expanded with [`globstar`]. Matches
/// that no longer exist (for instance because a parent directory was already
/// removed) are skipped. Patterns that would select `root` itself, or that
/// climb out of it through a `..` segment, are ignored.
///
/// Returns the number of paths removed.
pub fn remove_matching(root: &str, patterns: &[String]) -> Result<usize> {
    let mut removed = 0;

    for pattern in patterns {
        let relative = strip_relative_prefix(pattern.trim());
        if relative.is_empty() || relative == "." {
            log::warn!("ignoring cleanup pattern '{pattern}' that selects {root} itself");
            continue;
        }
        if relative.split('/').any(|segment| segment == "..") {
            log::warn!("ignoring cleanup pattern '{pattern}' that leaves {root}");
            continue;
        }

        for path in globstar(&join_relative(&escape(root), relative)) {
            if fs_ops::exists(&path) {
                fs_ops::remove(&path)?;
                log::debug!("removed {}", path.display());
                removed += 1;
            }
        }
    }

    Ok(removed)
}
