//! Filesystem operations used to build and tear down staging trees.
//!
//! These cover existence checks, recursive removal, directory creation with a
//! permission mode, single-file copies and recursive mirroring.

use crate::BundleError;
use crate::Result;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Default mode for directories created while staging.
pub const DIR_MODE: u32 = 0o755;

/// Returns `true` if something exists at `path`.
///
/// Dangling symlinks count as existing so that cleanup passes can remove them.
#[must_use]
pub fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Removes a file, symlink or directory tree.
///
/// A missing path is not an error.
pub fn remove(path: &Path) -> Result<()> {
    let metadata = match path.symlink_metadata() {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Creates `path` and any missing parents with the given unix mode.
pub fn create_dir(path: &Path, mode: u32) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder.create(path)?;
    Ok(())
}

/// Copies a single file, creating the destination's parent directories.
///
/// Returns the number of bytes copied.
pub fn copy_file(source: &Path, destination: &Path) -> Result<u64> {
    if !source.is_file() {
        return Err(BundleError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }
    if let Some(parent) = destination.parent() {
        create_dir(parent, DIR_MODE)?;
    }
    Ok(fs::copy(source, destination)?)
}

/// Recursively copies the directory `source` into `destination`.
///
/// The tree structure is preserved. Symlinks are dereferenced: a link to a
/// file becomes a copy of that file and a link to a directory becomes a copy
/// of its contents, so nothing in `destination` points back outside of it.
/// Dangling links, link cycles and special files are skipped with a warning.
/// When `destination` lies inside `source` its subtree is skipped, so a
/// project can be mirrored into a staging folder under itself.
///
/// Returns the number of regular files copied.
pub fn mirror(source: &Path, destination: &Path) -> Result<usize> {
    if !source.is_dir() {
        return Err(BundleError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }

    create_dir(destination, DIR_MODE)?;
    let source = source.canonicalize()?;
    let skip = destination.canonicalize()?;

    let walker = WalkDir::new(&source)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.path() != skip);

    let mut files = 0;
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.loop_ancestor().is_some() {
                    log::warn!("skipping symlink cycle: {err}");
                    continue;
                }
                if let Some(path) = err.path()
                    && is_dangling_symlink(path)
                {
                    log::warn!("skipping dangling symlink {}", path.display());
                    continue;
                }
                return Err(io::Error::other(format!("walkdir error: {err}")).into());
            }
        };
        let Ok(relative) = entry.path().strip_prefix(&source) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = skip.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            create_dir(&target, DIR_MODE)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target)?;
            files += 1;
        } else {
            log::warn!("skipping special file {}", entry.path().display());
        }
    }

    log::debug!(
        "mirrored {} files from {} into {}",
        files,
        source.display(),
        skip.display()
    );
    Ok(files)
}

/// Returns `true` if `path` is a symlink whose target does not exist.
pub fn is_dangling_symlink(path: &Path) -> bool {
    path.symlink_metadata()
        .is_ok_and(|m| m.file_type().is_symlink())
        && !path.exists()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_exists_and_remove_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "a").unwrap();

        assert!(exists(&file));
        remove(&file).unwrap();
        assert!(!exists(&file));
    }

    #[test]
    fn test_remove_directory_tree() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("cache");
        fs::create_dir_all(dir.join("nested/deeper")).unwrap();
        fs::write(dir.join("nested/deeper/f"), "x").unwrap();

        remove(&dir).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        assert!(remove(&temp.path().join("nope")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_create_dir_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a/b");
        create_dir(&dir, 0o750).unwrap();

        let mode = fs::metadata(&dir).unwrap().permissions().mode();
        assert!(dir.is_dir());
        assert_eq!(mode & 0o027, 0);
    }

    #[test]
    fn test_copy_file_creates_parents() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("readme.txt");
        fs::write(&src, "hello").unwrap();
        let dst = temp.path().join("out/deep/readme.txt");

        assert_eq!(copy_file(&src, &dst).unwrap(), 5);
        assert_eq!(fs::read_to_string(dst).unwrap(), "hello");
    }

    #[test]
    fn test_copy_file_missing_source() {
        let temp = TempDir::new().unwrap();
        let result = copy_file(&temp.path().join("missing"), &temp.path().join("dst"));
        assert!(matches!(result, Err(BundleError::SourceNotFound { .. })));
    }

    #[test]
    fn test_mirror_preserves_structure() {
        let src = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("src/child")).unwrap();
        fs::create_dir(src.path().join("empty")).unwrap();
        fs::write(src.path().join("main.php"), "<?php").unwrap();
        fs::write(src.path().join("src/child/b.vue"), "b").unwrap();

        let dst = TempDir::new().unwrap();
        let target = dst.path().join("staged");
        let files = mirror(src.path(), &target).unwrap();

        assert_eq!(files, 2);
        assert_eq!(fs::read_to_string(target.join("main.php")).unwrap(), "<?php");
        assert_eq!(fs::read_to_string(target.join("src/child/b.vue")).unwrap(), "b");
        assert!(target.join("empty").is_dir());
    }

    #[test]
    fn test_mirror_into_own_subdirectory() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), "a").unwrap();
        let target = src.path().join("plugin");

        mirror(src.path(), &target).unwrap();

        assert!(target.join("a.txt").is_file());
        assert!(!target.join("plugin").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_mirror_dereferences_symlinks() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("keep.map"), "keep").unwrap();
        fs::write(outside.path().join("main.php"), "main").unwrap();

        let src = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), src.path().join("linked")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("main.php"), src.path().join("p.php"))
            .unwrap();
        std::os::unix::fs::symlink("nowhere", src.path().join("broken")).unwrap();

        let dst = TempDir::new().unwrap();
        let target = dst.path().join("m");
        let files = mirror(src.path(), &target).unwrap();

        assert_eq!(files, 3);
        for copied in ["linked", "linked/keep.map", "p.php"] {
            let meta = target.join(copied).symlink_metadata().unwrap();
            assert!(!meta.file_type().is_symlink(), "{copied} is still a link");
        }
        assert_eq!(fs::read_to_string(target.join("p.php")).unwrap(), "main");
        assert!(!exists(&target.join("broken")));

        remove(&target.join("linked/keep.map")).unwrap();
        assert!(outside.path().join("keep.map").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_mirror_skips_symlink_cycle() {
        let src = TempDir::new().unwrap();
        fs::create_dir(src.path().join("a")).unwrap();
        fs::write(src.path().join("a/f.txt"), "f").unwrap();
        std::os::unix::fs::symlink(src.path(), src.path().join("a/loop")).unwrap();

        let dst = TempDir::new().unwrap();
        let target = dst.path().join("m");
        mirror(src.path(), &target).unwrap();

        assert!(target.join("a/f.txt").is_file());
        assert!(!target.join("a/loop/a").exists());
    }

    #[test]
    fn test_mirror_missing_source() {
        let temp = TempDir::new().unwrap();
        let result = mirror(&temp.path().join("missing"), &temp.path().join("dst"));
        assert!(matches!(result, Err(BundleError::SourceNotFound { .. })));
    }
}
