//! Canonical base directory and relative path anchoring.

use crate::BundleError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;

/// The directory project-relative patterns are resolved from.
///
/// Once constructed, a `BaseDir` is an existing directory held as an
/// absolute, symlink-free, UTF-8 path.
///
/// # Examples
///
/// ```no_run
/// use ptbundle_core::BaseDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let base = BaseDir::new("./my-plugin")?;
/// let target = base.resolve("./node_modules");
/// assert!(target.ends_with("/node_modules"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDir {
    path: PathBuf,
    display: String,
}

impl BaseDir {
    /// Canonicalizes and validates `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist
    /// - The path is not a directory
    /// - The canonical path is not valid UTF-8
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(BundleError::BaseDirNotFound { path });
        }
        if !path.is_dir() {
            return Err(BundleError::NotADirectory { path });
        }

        let canonical = path.canonicalize()?;
        let display = canonical
            .to_str()
            .ok_or_else(|| BundleError::NonUtf8Path {
                path: canonical.clone(),
            })?
            .to_owned();

        Ok(Self {
            path: canonical,
            display,
        })
    }

    /// Uses the process working directory.
    pub fn current() -> Result<Self> {
        Self::new(std::env::current_dir()?)
    }

    /// Returns the directory as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Returns the directory as a `&str`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Anchors a project-relative path (or pattern) to this directory.
    ///
    /// Existence is not checked.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ptbundle_core::BaseDir;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let base = BaseDir::new("/srv/plugin")?;
    /// assert_eq!(base.resolve("./sub/f.txt"), base.resolve("/sub/f.txt"));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn resolve(&self, relative: &str) -> String {
        join_relative(&self.display, relative)
    }
}

impl AsRef<Path> for BaseDir {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Strips one leading `./` and then one leading `/`.
///
/// # Examples
///
/// ```
/// use ptbundle_core::types::strip_relative_prefix;
///
/// assert_eq!(strip_relative_prefix("./sub/f.txt"), "sub/f.txt");
/// assert_eq!(strip_relative_prefix("/sub/f.txt"), "sub/f.txt");
/// assert_eq!(strip_relative_prefix("sub/f.txt"), "sub/f.txt");
/// assert_eq!(strip_relative_prefix(".htaccess"), ".htaccess");
/// ```
#[must_use]
pub fn strip_relative_prefix(path: &str) -> &str {
    let path = path.strip_prefix("./").unwrap_or(path);
    path.strip_prefix('/').unwrap_or(path)
}

/// Joins `relative` under `root` with exactly one separator.
#[must_use]
pub fn join_relative(root: &str, relative: &str) -> String {
    let root = root.strip_suffix('/').unwrap_or(root);
    format!("{root}/{}", strip_relative_prefix(relative))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_base_dir_canonicalizes() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("project")).unwrap();

        let base = BaseDir::new(temp.path().join("project/../project")).unwrap();
        assert_eq!(base.as_path(), temp.path().canonicalize().unwrap().join("project"));
        assert!(base.as_path().is_absolute());
    }

    #[test]
    fn test_base_dir_missing() {
        let temp = TempDir::new().unwrap();
        let result = BaseDir::new(temp.path().join("missing"));
        assert!(matches!(result, Err(BundleError::BaseDirNotFound { .. })));
    }

    #[test]
    fn test_base_dir_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let result = BaseDir::new(&file);
        assert!(matches!(result, Err(BundleError::NotADirectory { .. })));
    }

    #[test]
    fn test_resolve_prefix_forms_agree() {
        let temp = TempDir::new().unwrap();
        let base = BaseDir::new(temp.path()).unwrap();

        let expected = format!("{}/sub/f.txt", base.as_str());
        assert_eq!(base.resolve("./sub/f.txt"), expected);
        assert_eq!(base.resolve("sub/f.txt"), expected);
        assert_eq!(base.resolve("/sub/f.txt"), expected);
    }

    #[test]
    fn test_resolve_keeps_glob_markers() {
        let temp = TempDir::new().unwrap();
        let base = BaseDir::new(temp.path()).unwrap();
        assert_eq!(
            base.resolve("**/*.vue"),
            format!("{}/**/*.vue", base.as_str())
        );
    }

    #[test]
    fn test_strip_only_one_prefix() {
        assert_eq!(strip_relative_prefix("././a"), "./a");
        assert_eq!(strip_relative_prefix("//a"), "/a");
        assert_eq!(strip_relative_prefix(".//a"), "a");
        assert_eq!(strip_relative_prefix("../a"), "../a");
    }

    #[test]
    fn test_join_relative_root() {
        assert_eq!(join_relative("/", "etc"), "/etc");
        assert_eq!(join_relative("/srv/", "./x"), "/srv/x");
    }
}
