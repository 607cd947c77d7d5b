//! Shell-style wildcard matching for a single path segment.
//!
//! Supports:
//! - `*` matches any run of characters (including none)
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]`, `[!x]`, `[^x]` bracket classes
//! - `\x` matches `x` literally
//!
//! An unterminated `[` is matched as a literal character.

/// Characters that make a segment a wildcard pattern.
const WILDCARDS: [char; 3] = ['*', '?', '['];

/// Returns `true` if `pattern` contains an unescaped wildcard character.
///
/// # Examples
///
/// ```
/// use ptbundle_core::glob::matcher::has_wildcards;
///
/// assert!(has_wildcards("*.min.*"));
/// assert!(has_wildcards("file[0-9]"));
/// assert!(!has_wildcards("deleteme"));
/// assert!(!has_wildcards(r"literal\*star"));
/// ```
#[must_use]
pub fn has_wildcards(pattern: &str) -> bool {
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if WILDCARDS.contains(&c) {
            return true;
        }
    }
    false
}

/// Matches `name` against a wildcard `pattern`.
///
/// # Examples
///
/// ```
/// use ptbundle_core::glob::matcher::matches;
///
/// assert!(matches("*.min.*", "css_asset.min.css"));
/// assert!(matches("?.vue", "a.vue"));
/// assert!(matches("[!.]*", "src"));
/// assert!(!matches("*.css", "app.js"));
/// ```
#[must_use]
pub fn matches(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let mut pi = 0;
    let mut ni = 0;
    // Position of the last `*` and the name index it is currently absorbing up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while ni < name.len() {
        if pi < pattern.len() && pattern[pi] == '*' {
            backtrack = Some((pi, ni));
            pi += 1;
            continue;
        }

        if let Some(next) = match_one(&pattern, pi, name[ni]) {
            pi = next;
            ni += 1;
            continue;
        }

        match backtrack {
            Some((star, absorbed)) => {
                pi = star + 1;
                ni = absorbed + 1;
                backtrack = Some((star, absorbed + 1));
            }
            None => return false,
        }
    }

    while pi < pattern.len() && pattern[pi] == '*' {
        pi += 1;
    }
    pi == pattern.len()
}

/// Matches a segment, refusing to let wildcards match a leading `.`.
///
/// Hidden entries are only matched by segments that start with a literal `.`.
///
/// # Examples
///
/// ```
/// use ptbundle_core::glob::matcher::matches_segment;
///
/// assert!(!matches_segment("*", ".git"));
/// assert!(matches_segment(".*", ".git"));
/// assert!(matches_segment("*", "src"));
/// ```
#[must_use]
pub fn matches_segment(pattern: &str, name: &str) -> bool {
    if name.starts_with('.') && !pattern.starts_with('.') {
        return false;
    }
    matches(pattern, name)
}

/// Escapes wildcard characters so `path` is matched literally.
///
/// # Examples
///
/// ```
/// use ptbundle_core::glob::matcher::escape;
/// use ptbundle_core::glob::matcher::matches;
///
/// let escaped = escape("weird[1]*dir");
/// assert!(matches(&escaped, "weird[1]*dir"));
/// assert!(!matches(&escaped, "weird1xdir"));
/// ```
#[must_use]
pub fn escape(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '*' | '?' | '[' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Removes backslash escapes from a segment without wildcards.
#[must_use]
pub fn unescape(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Matches one non-star token of `pattern` at `pi` against `c`.
///
/// Returns the index just past the token on success.
fn match_one(pattern: &[char], pi: usize, c: char) -> Option<usize> {
    let token = *pattern.get(pi)?;
    match token {
        '?' => Some(pi + 1),
        '[' => match match_class(pattern, pi, c) {
            Some((true, next)) => Some(next),
            Some((false, _)) => None,
            None => (c == '[').then_some(pi + 1),
        },
        '\\' if pi + 1 < pattern.len() => (pattern[pi + 1] == c).then_some(pi + 2),
        literal => (literal == c).then_some(pi + 1),
    }
}

/// Evaluates the bracket class starting at `start`.
///
/// Returns `(matched, index past the closing bracket)`, or `None` if the
/// class is never closed.
fn match_class(pattern: &[char], start: usize, c: char) -> Option<(bool, usize)> {
    let mut i = start + 1;
    let negated = matches!(pattern.get(i), Some('!' | '^'));
    if negated {
        i += 1;
    }

    let mut matched = false;
    let mut first = true;
    loop {
        let mut lo = *pattern.get(i)?;
        if lo == ']' && !first {
            break;
        }
        if lo == '\\' {
            i += 1;
            lo = *pattern.get(i)?;
        }
        i += 1;

        if pattern.get(i) == Some(&'-') && pattern.get(i + 1).is_some_and(|hi| *hi != ']') {
            let hi = pattern[i + 1];
            if lo <= c && c <= hi {
                matched = true;
            }
            i += 2;
        } else if lo == c {
            matched = true;
        }
        first = false;
    }

    Some((matched != negated, i + 1))
}
