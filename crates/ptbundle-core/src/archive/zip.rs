//! Directory-to-ZIP serialization.
//!
//! The source directory "includes itself": its own name becomes the single
//! top-level entry of the archive, so unzipping reproduces a folder named
//! after the bundle rather than its bare contents.

use crate::BundleError;
use crate::Result;
use crate::archive::report::ArchiveReport;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::fs_ops::is_dangling_symlink;
use std::fs::File;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Archives the directory `source` into a new ZIP file at `destination`.
///
/// Every descendant is stored under `{basename(source)}/...`: the path of
/// `source`'s parent plus one separator is stripped from each entry. Files
/// become file entries, directories become explicit directory entries (so
/// empty directories survive), and symlinks are followed. Entries are written
/// in name-sorted depth-first order so that archiving the same tree twice
/// yields identical bytes. An existing file at `destination` is replaced.
///
/// # Examples
///
/// ```no_run
/// use ptbundle_core::archive_directory;
/// use std::path::Path;
///
/// let report = archive_directory(Path::new("./my-plugin"), Path::new("bundled/my-plugin.zip"))?;
/// println!("Added {} files", report.files_added);
/// # Ok::<(), ptbundle_core::BundleError>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - `source` does not exist or is not a directory
/// - `destination` cannot be created
/// - A file under `source` cannot be read
/// - A path under `source` is not valid UTF-8
pub fn archive_directory(source: &Path, destination: &Path) -> Result<ArchiveReport> {
    if !source.exists() {
        return Err(BundleError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }
    if !source.is_dir() {
        return Err(BundleError::NotADirectory {
            path: source.to_path_buf(),
        });
    }

    let file = File::create(destination)?;
    let report = write_directory(file, source)?;

    log::debug!(
        "wrote {} ({} files, {} directories)",
        destination.display(),
        report.files_added,
        report.directories_added
    );
    Ok(report)
}

/// Writes the tree under `source` into `writer` as a ZIP archive.
fn write_directory<W: Write + Seek>(writer: W, source: &Path) -> Result<ArchiveReport> {
    let start = Instant::now();

    // A path like `.` has no name of its own to use as the top-level entry.
    let source: PathBuf = if source.file_name().is_some() {
        source.to_path_buf()
    } else {
        source.canonicalize()?
    };
    let prefix = source.parent().unwrap_or_else(|| Path::new(""));

    let mut zip = ZipWriter::new(writer);
    let mut report = ArchiveReport::default();
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut buffer = CopyBuffer::new();

    let walker = WalkDir::new(&source).follow_links(true).sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if let Some(path) = err.path()
                    && is_dangling_symlink(path)
                {
                    report.entries_skipped += 1;
                    report.add_warning(format!("Skipped dangling symlink: {}", path.display()));
                    continue;
                }
                return Err(std::io::Error::other(format!("walkdir error: {err}")).into());
            }
        };

        let archive_path = entry.path().strip_prefix(prefix).map_err(|_| {
            std::io::Error::other(format!(
                "{} is not under {}",
                entry.path().display(),
                prefix.display()
            ))
        })?;
        let archive_name = normalize_zip_path(archive_path)?;
        let metadata = entry
            .metadata()
            .map_err(|e| std::io::Error::other(format!("walkdir error: {e}")))?;
        let entry_options = with_permissions(options, &metadata);

        if metadata.is_dir() {
            zip.add_directory(format!("{archive_name}/"), entry_options)?;
            report.directories_added += 1;
        } else if metadata.is_file() {
            let mut file = File::open(entry.path())?;
            zip.start_file(archive_name, entry_options)?;
            report.bytes_written += copy_with_buffer(&mut file, &mut zip, &mut buffer)?;
            report.files_added += 1;
        } else {
            report.entries_skipped += 1;
            report.add_warning(format!("Skipped special file: {}", entry.path().display()));
        }
    }

    zip.finish()?;
    report.duration = start.elapsed();
    Ok(report)
}

fn with_permissions(options: SimpleFileOptions, metadata: &std::fs::Metadata) -> SimpleFileOptions {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode())
    }
    #[cfg(not(unix))]
    {
        let _ = metadata;
        options
    }
}

/// Converts an archive-relative path to ZIP's forward-slash form.
fn normalize_zip_path(path: &Path) -> Result<String> {
    let path_str = path.to_str().ok_or_else(|| BundleError::NonUtf8Path {
        path: path.to_path_buf(),
    })?;

    #[cfg(windows)]
    let normalized = path_str.replace('\\', "/");

    #[cfg(not(windows))]
    let normalized = path_str.to_owned();

    Ok(normalized)
}
