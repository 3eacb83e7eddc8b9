//! Path normalization.
//!
//! Paths are plain `/`-separated strings. Empty segments and `.` are
//! dropped; `..` is an ordinary name and is never collapsed.

/// Split a path into its segments.
///
/// `"/a//b/./c/"` becomes `["a", "b", "c"]`. The root is the empty list.
pub fn normalize(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

/// Render segments as an absolute path.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(segment.as_ref());
    }
    out
}

/// Returns true if `inner` equals `outer` or lies beneath it.
pub fn is_within(outer: &[&str], inner: &[&str]) -> bool {
    inner.len() >= outer.len() && inner[..outer.len()] == *outer
}
