//! Path building for REST resources.
//!
//! API paths are assembled from raw segments (owner names, repository names,
//! issue numbers). Each segment is percent-encoded so a value containing `/`,
//! `?` or spaces cannot change the shape of the path.
//!
//! [`UrlCache`] memoizes assembled paths. It only saves string work: a cache
//! miss and a cache hit return the same value.
//!
//! # Example
//!
//! ```rust
//! use github_api::rest::{build_path, UrlCache};
//!
//! assert_eq!(build_path(&["repos", "octocat", "hello world"]), "repos/octocat/hello%20world");
//!
//! let cache = UrlCache::new();
//! let first = cache.build(&["users", "octocat", "repos"]);
//! let second = cache.build(&["users", "octocat", "repos"]);
//! assert_eq!(first, second);
//! assert_eq!(cache.len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

/// Percent-encodes one path segment.
#[must_use]
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Joins segments into a relative path, encoding each one.
#[must_use]
pub fn build_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|segment| encode_segment(segment))
        .collect::<Vec<_>>()
        .join("/")
}

/// Append-only memo of segment tuples to assembled paths.
///
/// Safe to share between tasks. A poisoned lock degrades to recomputing the
/// path on every call.
#[derive(Debug, Default)]
pub struct UrlCache {
    entries: RwLock<HashMap<Vec<String>, String>>,
}

impl UrlCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the path for `segments`, assembling and storing it on a miss.
    #[must_use]
    pub fn build(&self, segments: &[&str]) -> String {
        let key: Vec<String> = segments.iter().map(|s| (*s).to_string()).collect();

        if let Ok(entries) = self.entries.read() {
            if let Some(path) = entries.get(&key) {
                tracing::trace!(path = %path, "URL cache hit");
                return path.clone();
            }
        }

        let path = build_path(segments);
        if let Ok(mut entries) = self.entries.write() {
            entries.entry(key).or_insert_with(|| path.clone());
        }
        path
    }

    /// Number of memoized paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    /// Returns `true` if nothing has been memoized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
