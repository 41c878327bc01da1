/*!
 * Path Resolver
 * Lexical path normalization, join, split and relative resolution
 *
 * All functions are pure string operations: no provider is consulted.
 * Only absolute paths are accepted by `normalize`; `..` above the root
 * is silently dropped, so `/../a` normalizes to `/a`.
 */

use super::types::{VfsError, VfsResult};

/// Path separator
pub const SEPARATOR: char = '/';

/// Root path
pub const ROOT: &str = "/";

/// Normalize an absolute path
///
/// Drops empty and `.` segments, pops one prior segment per `..`,
/// and rejoins with a single leading separator.
pub fn normalize(path: &str) -> VfsResult<String> {
    if !path.starts_with(SEPARATOR) {
        return Err(VfsError::invalid_path(path).with_detail("path must be absolute"));
    }
    Ok(clean(path))
}

/// Lexically clean a path that is already rooted
fn clean(rooted: &str) -> String {
    path_clean::clean(rooted).to_string_lossy().into_owned()
}

/// Concatenate raw segments, then normalize
///
/// The result is always absolute.
pub fn join<S: AsRef<str>>(parts: &[S]) -> String {
    let mut rooted = String::from(ROOT);
    for part in parts {
        rooted.push(SEPARATOR);
        rooted.push_str(part.as_ref());
    }
    clean(&rooted)
}

/// Segments of a normalized path (empty for the root)
pub fn split(path: &str) -> VfsResult<Vec<String>> {
    let normalized = normalize(path)?;
    Ok(segments(&normalized).map(str::to_string).collect())
}

/// Segments of an already-normalized path
pub(crate) fn segments(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(SEPARATOR).filter(|s| !s.is_empty())
}

/// Parent directory of a path; the root is its own parent
pub fn dirname(path: &str) -> VfsResult<String> {
    let normalized = normalize(path)?;
    Ok(parent_of(&normalized).to_string())
}

/// Parent of an already-normalized path
pub(crate) fn parent_of(normalized: &str) -> &str {
    match normalized.rfind(SEPARATOR) {
        Some(0) | None => ROOT,
        Some(idx) => &normalized[..idx],
    }
}

/// Final component of an already-normalized path
pub(crate) fn file_name(normalized: &str) -> &str {
    match normalized.rfind(SEPARATOR) {
        Some(idx) => &normalized[idx + 1..],
        None => normalized,
    }
}

/// Final component, optionally stripping a suffix
///
/// The suffix is only removed when something remains afterwards.
pub fn basename(path: &str, suffix: Option<&str>) -> VfsResult<String> {
    let normalized = normalize(path)?;
    let name = file_name(&normalized);
    let name = match suffix {
        Some(suffix) if !suffix.is_empty() && name.len() > suffix.len() => {
            name.strip_suffix(suffix).unwrap_or(name)
        }
        _ => name,
    };
    Ok(name.to_string())
}

/// Extension of the final component including the dot
///
/// Empty when there is no dot, or the only dot leads the name.
pub fn extname(path: &str) -> VfsResult<String> {
    let normalized = normalize(path)?;
    let name = file_name(&normalized);
    match name.rfind('.') {
        Some(0) | None => Ok(String::new()),
        Some(idx) => Ok(name[idx..].to_string()),
    }
}

/// Resolve parts against a base
///
/// Absolute parts replace the accumulator; relative parts are joined.
pub fn resolve<S: AsRef<str>>(base: &str, parts: &[S]) -> VfsResult<String> {
    let mut acc = normalize(base)?;
    for part in parts {
        let part = part.as_ref();
        acc = if part.starts_with(SEPARATOR) {
            normalize(part)?
        } else {
            join(&[acc.as_str(), part])
        };
    }
    Ok(acc)
}

/// Relative path leading from `from` to `to`
pub fn relative(from: &str, to: &str) -> VfsResult<String> {
    let from = normalize(from)?;
    let to = normalize(to)?;
    let from_segments: Vec<&str> = segments(&from).collect();
    let to_segments: Vec<&str> = segments(&to).collect();

    let common = from_segments
        .iter()
        .zip(&to_segments)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat("..").take(from_segments.len() - common));
    parts.extend_from_slice(&to_segments[common..]);

    if parts.is_empty() {
        Ok(".".to_string())
    } else {
        Ok(parts.join("/"))
    }
}

/// Segment-aware prefix test on normalized paths
///
/// `/a` is an ancestor of `/a` and `/a/b`, never of `/ab`.
pub fn is_ancestor(prefix: &str, path: &str) -> bool {
    if prefix == ROOT {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
        None => false,
    }
}

/// Remainder of `path` below `prefix`, as an absolute path
pub(crate) fn strip_ancestor(prefix: &str, path: &str) -> String {
    if prefix == ROOT {
        return path.to_string();
    }
    match path.strip_prefix(prefix) {
        Some("") | None => ROOT.to_string(),
        Some(rest) => rest.to_string(),
    }
}
