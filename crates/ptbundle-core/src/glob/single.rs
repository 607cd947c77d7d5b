//! Single-level glob expansion (no `**`).
//!
//! Each `/`-separated segment of the pattern is either matched literally or
//! expanded against the entries of the directories matched so far. Missing
//! or unreadable directories simply produce no matches.

use crate::glob::matcher::has_wildcards;
use crate::glob::matcher::matches_segment;
use crate::glob::matcher::unescape;
use std::fs;
use std::path::Path;

/// Which kinds of filesystem entries a glob may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Files, directories and symlinks.
    Any,
    /// Directories only (symlinks to directories included).
    Directories,
}

/// Expands a pattern whose wildcards never span a `/`.
///
/// Matched paths keep the pattern's own prefix (`./src/*` yields
/// `./src/...`, an absolute pattern yields absolute paths). The result is
/// sorted ascending.
///
/// # Examples
///
/// ```no_run
/// use ptbundle_core::glob::MatchKind;
/// use ptbundle_core::glob::glob;
///
/// for css in glob("dist/assets/*.css", MatchKind::Any) {
///     println!("{css}");
/// }
/// ```
#[must_use]
pub fn glob(pattern: &str, kind: MatchKind) -> Vec<String> {
    let absolute = pattern.starts_with('/');
    let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() {
        return if absolute {
            vec!["/".to_owned()]
        } else {
            Vec::new()
        };
    }

    let mut current = vec![if absolute { "/".to_owned() } else { String::new() }];

    for (idx, segment) in segments.iter().enumerate() {
        let last = idx + 1 == segments.len();
        let mut next = Vec::new();

        for base in &current {
            if has_wildcards(segment) {
                next.extend(
                    list_names(base)
                        .into_iter()
                        .filter(|name| matches_segment(segment, name))
                        .map(|name| join(base, &name)),
                );
            } else {
                next.push(join(base, &unescape(segment)));
            }
        }

        current = next
            .into_iter()
            .filter(|path| {
                let path = Path::new(path);
                if !last || kind == MatchKind::Directories {
                    path.is_dir()
                } else {
                    path.symlink_metadata().is_ok()
                }
            })
            .collect();

        if current.is_empty() {
            break;
        }
    }

    current.sort();
    current.dedup();
    current
}

/// Lists the real (non-symlink) subdirectories of `dir`, skipping hidden ones.
pub(crate) fn subdirectories(dir: &str) -> Vec<String> {
    let Ok(entries) = fs::read_dir(listing_path(dir)) else {
        return Vec::new();
    };

    let mut dirs: Vec<String> = entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
        .filter_map(|entry| utf8_name(&entry))
        .filter(|name| !name.starts_with('.'))
        .map(|name| join(dir, &name))
        .collect();
    dirs.sort();
    dirs
}

/// Joins a matched prefix and an entry name with exactly one separator.
pub(crate) fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_owned()
    } else if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}

fn list_names(dir: &str) -> Vec<String> {
    match fs::read_dir(listing_path(dir)) {
        Ok(entries) => entries
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| utf8_name(&entry))
            .collect(),
        Err(e) => {
            log::trace!("cannot list {}: {e}", listing_path(dir).display());
            Vec::new()
        }
    }
}

fn listing_path(dir: &str) -> &Path {
    if dir.is_empty() {
        Path::new(".")
    } else {
        Path::new(dir)
    }
}

fn utf8_name(entry: &fs::DirEntry) -> Option<String> {
    match entry.file_name().into_string() {
        Ok(name) => Some(name),
        Err(raw) => {
            log::warn!("skipping non UTF-8 entry {}", Path::new(&raw).display());
            None
        }
    }
}
