//! Path utilities for validation and normalization
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

pub mod hierarchy;
pub use hierarchy::{parent_name, StateHierarchy};

/// Validates if a URL path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use cu_router::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/editApplication/acme/overview"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("editApplication")); // Missing leading /
/// assert!(!is_valid_path("/editApplication/")); // Trailing /
/// assert!(!is_valid_path("/editApplication//overview")); // Double //
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a URL path to canonical form
///
/// Returns `Cow::Borrowed` when input is already valid (zero allocations).
/// Returns `Cow::Owned` when normalization needed (single allocation).
///
/// Query strings and fragments are not part of state matching and are dropped.
///
/// # Examples
///
/// ```
/// use cu_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// let path = normalize_path("/editApplication/acme/logs");
/// assert!(matches!(path, Cow::Borrowed("/editApplication/acme/logs")));
///
/// assert_eq!(normalize_path("/editApplication/acme/logs/"), "/editApplication/acme/logs");
/// assert_eq!(normalize_path("\\editApplication\\acme"), "/editApplication/acme");
/// assert_eq!(normalize_path("/editApplication/acme/logs?tail=50"), "/editApplication/acme/logs");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let path = strip_query(path);

    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Cuts everything from the first `?` or `#`
fn strip_query(path: &str) -> &str {
    path.find(['?', '#']).map_or(path, |pos| &path[..pos])
}

/// Splits a canonical path into its non-empty segments
pub(crate) fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_path() {
        assert!(is_valid_path("/"));
        assert!(is_valid_path("/editApplication"));
        assert!(is_valid_path("/editApplication/acme/monitoringApp"));

        assert!(!is_valid_path(""));
        assert!(!is_valid_path("overview"));
        assert!(!is_valid_path("/overview/"));
        assert!(!is_valid_path("/editApplication//overview"));
        assert!(!is_valid_path("/editApplication\\overview"));
    }

    #[test]
    fn test_normalize_path_valid_is_borrowed() {
        let path = normalize_path("/editApplication/acme");
        assert!(matches!(path, Cow::Borrowed("/editApplication/acme")));

        let path = normalize_path("/");
        assert!(matches!(path, Cow::Borrowed("/")));
    }

    #[test]
    fn test_normalize_path_repairs_separators() {
        assert_eq!(normalize_path("/editApplication/acme/"), "/editApplication/acme");
        assert_eq!(normalize_path("/editApplication///acme"), "/editApplication/acme");
        assert_eq!(normalize_path("\\editApplication\\acme"), "/editApplication/acme");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_normalize_path_drops_query_and_fragment() {
        assert_eq!(normalize_path("/editApplication/acme/logs?tail=10"), "/editApplication/acme/logs");
        assert_eq!(normalize_path("/editApplication/acme#top"), "/editApplication/acme");
        assert_eq!(normalize_path("?x=1"), "/");
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("/editApplication/acme"), vec!["editApplication", "acme"]);
        assert!(segments("/").is_empty());
    }
}
