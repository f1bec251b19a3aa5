//! Prefix matching and path rewriting.
//!
//! # Design Decisions
//! - Matching is a plain case-sensitive `starts_with`, no regex
//! - The prefix keeps its trailing slash for matching, so `/ace-api` and
//!   `/ace-apix/` never match `/ace-api/`
//! - Rewriting strips the mount (prefix minus trailing slash) exactly once,
//!   leaving the suffix rooted at `/`

/// Matches request targets against the relay prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. `prefix` should look like `/ace-api/`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns true if the path (or path-and-query) is under the prefix.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Strip the mount from a path-and-query, keeping the leading `/` and
    /// any query string untouched. Returns `None` for non-matching targets.
    pub fn strip<'a>(&self, path_and_query: &'a str) -> Option<&'a str> {
        if !self.matches(path_and_query) {
            return None;
        }
        let mount_len = self.prefix.len() - 1;
        Some(&path_and_query[mount_len..])
    }
}
