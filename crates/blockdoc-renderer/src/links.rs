//! Link target and image source rewriting.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::book::Book;

/// Suffix marking links to other converted pages.
pub const PAGE_SUFFIX: &str = ".franklin";

/// Extension of markup source files.
pub const SOURCE_EXTENSION: &str = ".adoc";

/// Directory holding a topic's images, beside the topic.
pub const IMAGES_DIR: &str = "images";

static HYPHEN_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{3,}").unwrap());

/// Strip the page suffix from a target, if present.
#[must_use]
pub fn strip_page_suffix(target: &str) -> &str {
    target.strip_suffix(PAGE_SUFFIX).unwrap_or(target)
}

/// Collapse runs of three or more `-` into `--`.
#[must_use]
pub fn collapse_hyphens(text: &str) -> String {
    HYPHEN_RUN_RE.replace_all(text, "--").into_owned()
}

/// Normalize an absolute URL: lowercase host, collapsed hyphen runs in the host and
/// (for `http(s)` URLs) the path.
///
/// Targets that do not parse as absolute URLs are returned unchanged.
#[must_use]
pub fn normalize_url(target: &str) -> String {
    let mut url = match Url::parse(target) {
        Ok(url) => url,
        Err(e) => {
            tracing::trace!(link = target, error = %e, "Link target is not an absolute URL");
            return target.to_owned();
        }
    };

    if let Some(host) = url.host_str() {
        let host = collapse_hyphens(&host.to_lowercase());
        if let Err(e) = url.set_host(Some(&host)) {
            tracing::warn!(link = target, error = %e, "Failed to normalize link host");
            return target.to_owned();
        }
    }
    if matches!(url.scheme(), "http" | "https") {
        let path = collapse_hyphens(url.path());
        url.set_path(&path);
    }
    url.into()
}

/// Whether a target is an absolute `http(s)` URL.
#[must_use]
pub fn is_http_url(target: &str) -> bool {
    Url::parse(target).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Join a relative target onto the directory containing `topic_path`.
///
/// `.` and `..` segments are resolved; a leading `/` starts from the collection root.
///
/// ```
/// use blockdoc_renderer::join_topic_path;
///
/// assert_eq!(join_topic_path("guide/intro.adoc", "./sub"), "guide/sub");
/// assert_eq!(join_topic_path("guide/deep/intro.adoc", "../other"), "guide/other");
/// assert_eq!(join_topic_path("guide/intro.adoc", "/top"), "top");
/// ```
#[must_use]
pub fn join_topic_path(topic_path: &str, target: &str) -> String {
    let mut segments: Vec<&str> = if target.starts_with('/') {
        Vec::new()
    } else {
        let mut dir: Vec<&str> = topic_path.split('/').filter(|s| !s.is_empty()).collect();
        dir.pop();
        dir
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

/// Resolved include target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncludeTarget {
    pub url: String,
    pub variants: Vec<&'static str>,
}

/// Resolve an include target: strip the source extension, then resolve
/// non-`http(s)` targets through the book relative to the topic.
#[must_use]
pub fn resolve_include(target: &str, topic_path: &str, book: &dyn Book) -> IncludeTarget {
    let target = target.strip_suffix(SOURCE_EXTENSION).unwrap_or(target);
    if is_http_url(target) {
        return IncludeTarget {
            url: target.to_owned(),
            variants: Vec::new(),
        };
    }
    IncludeTarget {
        url: book.resolve(&join_topic_path(topic_path, target)),
        variants: vec!["docs"],
    }
}

/// Resolve an image target to its site URL.
///
/// Relative targets live in the images directory beside the topic.
#[must_use]
pub fn resolve_image(target: &str, topic_path: &str, book: &dyn Book) -> String {
    if is_http_url(target) {
        return target.to_owned();
    }
    let relative = format!("{IMAGES_DIR}/{}", target.trim_start_matches("./"));
    book.resolve(&join_topic_path(topic_path, &relative))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::book::SiteBook;

    #[test]
    fn test_strip_page_suffix() {
        assert_eq!(strip_page_suffix("guide/intro.franklin"), "guide/intro");
        assert_eq!(strip_page_suffix("guide/intro.html"), "guide/intro.html");
        assert_eq!(strip_page_suffix("a.franklin.franklin"), "a.franklin");
        assert_eq!(strip_page_suffix(""), "");
    }

    #[test]
    fn test_normalize_url_host_and_path() {
        assert_eq!(
            normalize_url("https://Example.com/a---b"),
            "https://example.com/a--b"
        );
        assert_eq!(
            normalize_url("https://my----site.COM/x-y"),
            "https://my--site.com/x-y"
        );
    }

    #[test]
    fn test_normalize_url_keeps_opaque_paths() {
        assert_eq!(
            normalize_url("mailto:first---last@example.com"),
            "mailto:first---last@example.com"
        );
    }

    #[test]
    fn test_normalize_url_is_idempotent() {
        let once = normalize_url("https://Docs---Example.com/Path---To");
        assert_eq!(normalize_url(&once), once);
    }

    #[test]
    fn test_normalize_url_leaves_relative_targets() {
        assert_eq!(normalize_url("./sub---page.adoc"), "./sub---page.adoc");
        assert_eq!(normalize_url("#anchor"), "#anchor");
    }

    #[test]
    fn test_collapse_hyphens() {
        assert_eq!(collapse_hyphens("a-b--c---d-----e"), "a-b--c--d--e");
    }

    #[test]
    fn test_join_topic_path_from_root_topic() {
        assert_eq!(join_topic_path("intro.adoc", "sub"), "sub");
        assert_eq!(join_topic_path("", "./sub"), "sub");
        assert_eq!(join_topic_path("intro.adoc", "../../sub"), "sub");
    }

    #[test]
    fn test_resolve_include_relative() {
        let book = SiteBook::new("https://docs.example.com");
        assert_eq!(
            resolve_include("./sub.adoc", "guide/intro.adoc", &book),
            IncludeTarget {
                url: "https://docs.example.com/guide/sub".to_owned(),
                variants: vec!["docs"],
            }
        );
    }

    #[test]
    fn test_resolve_include_http_passes_through() {
        let book = SiteBook::default();
        let include = resolve_include("https://example.com/frag.adoc", "guide/intro.adoc", &book);
        assert_eq!(include.url, "https://example.com/frag");
        assert!(include.variants.is_empty());
    }

    #[test]
    fn test_resolve_image() {
        let book = SiteBook::default();
        assert_eq!(
            resolve_image("flow.png", "guide/intro.adoc", &book),
            "/guide/images/flow.png"
        );
        assert_eq!(
            resolve_image("https://cdn.example.com/a.png", "guide/intro.adoc", &book),
            "https://cdn.example.com/a.png"
        );
    }
}
