//! Recursive `**` glob expansion.
//!
//! A `**` segment stands for zero or more directory levels. The pattern is
//! split at the first such segment into a root and a rest; the root is
//! expanded level by level into concrete directories, and every directory
//! found yields a new candidate pattern `dir + rest`. Candidates are pushed
//! onto a worklist until none of them contain another `**`.

use crate::glob::matcher::escape;
use crate::glob::matcher::has_wildcards;
use crate::glob::matcher::unescape;
use crate::glob::single::MatchKind;
use crate::glob::single::glob;
use crate::glob::single::subdirectories;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

/// The recursive-descent marker.
pub const RECURSIVE_MARKER: &str = "**";

/// Resolves a glob pattern that may contain `**` segments.
///
/// Returns every matching file or directory, deduplicated and sorted
/// ascending by path string. Directory matches are returned as-is, not
/// expanded into their contents. A pattern starting with `**` is anchored to
/// the current directory (`./**/...`). No match is an empty result.
///
/// Symlinked directories are matched but never descended into while
/// expanding `**`, and hidden directories are skipped the same way `*` skips
/// them.
///
/// # Examples
///
/// ```no_run
/// use ptbundle_core::globstar;
///
/// for vue in globstar("src/**/*.vue") {
///     println!("{}", vue.display());
/// }
/// ```
#[must_use]
pub fn globstar(pattern: &str) -> Vec<PathBuf> {
    let mut pending = vec![anchor(pattern)];
    let mut found = BTreeSet::new();

    while let Some(pattern) = pending.pop() {
        match split_at_marker(&pattern) {
            None => found.extend(glob(&pattern, MatchKind::Any)),
            Some((root, rest)) => pending.extend(expand_levels(root, rest)),
        }
    }

    found.into_iter().map(PathBuf::from).collect()
}

fn anchor(pattern: &str) -> String {
    if pattern.starts_with(RECURSIVE_MARKER) {
        format!("./{pattern}")
    } else {
        pattern.to_owned()
    }
}

/// Splits at the first `**` that forms a whole segment.
///
/// The separator in front of the marker is dropped from the root and the rest
/// keeps its leading separator, so `a/**/b` splits into `("a", "/b")`.
fn split_at_marker(pattern: &str) -> Option<(&str, &str)> {
    let bytes = pattern.as_bytes();
    pattern.match_indices(RECURSIVE_MARKER).find_map(|(pos, _)| {
        let end = pos + RECURSIVE_MARKER.len();
        let starts_segment = pos > 0 && bytes[pos - 1] == b'/';
        let ends_segment = end == bytes.len() || bytes[end] == b'/';
        (starts_segment && ends_segment).then(|| (&pattern[..pos - 1], &pattern[end..]))
    })
}

/// Produces the candidate patterns for one `root/**rest` split.
fn expand_levels(root: &str, rest: &str) -> Vec<String> {
    let mut candidates = vec![format!("{root}{rest}")];

    let mut frontier = if root.is_empty() {
        vec!["/".to_owned()]
    } else if has_wildcards(root) {
        glob(root, MatchKind::Directories)
    } else if Path::new(&unescape(root)).is_dir() {
        vec![unescape(root)]
    } else {
        Vec::new()
    };

    while !frontier.is_empty() {
        let next: Vec<String> = frontier
            .iter()
            .flat_map(|dir| subdirectories(dir))
            .collect();
        candidates.extend(next.iter().map(|dir| format!("{}{rest}", escape(dir))));
        frontier = next;
    }

    candidates
}
