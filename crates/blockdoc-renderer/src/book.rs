//! Site path resolution.

/// Maps collection-relative paths to absolute site URLs.
///
/// A book is read-only for the duration of a conversion.
pub trait Book: Send + Sync {
    /// Resolve a collection-relative path (no extension) to an absolute URL.
    fn resolve(&self, path: &str) -> String;
}

/// Book that joins paths onto a fixed base URL.
///
/// ```
/// use blockdoc_renderer::{Book, SiteBook};
///
/// let book = SiteBook::new("https://docs.example.com/");
/// assert_eq!(book.resolve("./guide/sub"), "https://docs.example.com/guide/sub");
/// assert_eq!(SiteBook::default().resolve("guide/sub"), "/guide/sub");
/// ```
#[derive(Clone, Debug)]
pub struct SiteBook {
    base_url: String,
}

impl SiteBook {
    /// Create a book rooted at `base_url` (e.g. `/` or `https://docs.example.com`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Base URL paths are joined onto.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for SiteBook {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Book for SiteBook {
    fn resolve(&self, path: &str) -> String {
        let mut path = path;
        while let Some(rest) = path.strip_prefix("./").or_else(|| path.strip_prefix('/')) {
            path = rest;
        }
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}
