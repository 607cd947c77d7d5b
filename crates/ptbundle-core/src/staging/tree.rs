//! The temporary directory a bundle is assembled in.

use crate::BundleError;
use crate::Result;
use crate::fs_ops;
use crate::types::join_relative;
use std::path::Path;
use std::path::PathBuf;

/// A staging directory named after the bundle.
///
/// The directory is removed when the value is dropped unless it was
/// explicitly [`remove`](Self::remove)d or [`persist`](Self::persist)ed, so
/// every early return out of a pipeline run leaves no staging tree behind.
#[derive(Debug)]
pub struct StagingTree {
    path: PathBuf,
    display: String,
    armed: bool,
}

impl StagingTree {
    /// Creates `{work_dir}/{name}` with mode `0o755`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Something already exists at the staging path
    /// - The directory cannot be created
    /// - The resulting path is not valid UTF-8
    pub fn create(work_dir: &Path, name: &str) -> Result<Self> {
        let path = work_dir.join(name);
        if fs_ops::exists(&path) {
            return Err(BundleError::StagingExists { path });
        }

        fs_ops::create_dir(&path, fs_ops::DIR_MODE)?;
        // Armed from here on: a failure below still cleans up.
        let mut tree = Self {
            path,
            display: String::new(),
            armed: true,
        };
        tree.path = tree.path.canonicalize()?;
        tree.display = tree
            .path
            .to_str()
            .ok_or_else(|| BundleError::NonUtf8Path {
                path: tree.path.clone(),
            })?
            .to_owned();

        log::debug!("created staging tree {}", tree.display);
        Ok(tree)
    }

    /// Returns the staging root.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the staging root as a `&str`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Anchors a relative path or pattern to the staging root.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> String {
        join_relative(&self.display, relative)
    }

    /// Deletes the staging tree now, reporting any failure.
    pub fn remove(mut self) -> Result<()> {
        self.armed = false;
        fs_ops::remove(&self.path)?;
        log::debug!("removed staging tree {}", self.display);
        Ok(())
    }

    /// Keeps the staging tree on disk and returns its path.
    #[must_use]
    pub fn persist(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for StagingTree {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs_ops::remove(&self.path);
        }
    }
}
