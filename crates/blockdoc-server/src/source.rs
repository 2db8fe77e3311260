//! Upstream document sources.

use std::time::Duration;

use ureq::Agent;

/// Extension appended to request paths when fetching from upstream.
pub const SOURCE_EXTENSION: &str = ".adoc";

/// Error raised when the upstream cannot be reached or read.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP transport or body read failure.
    #[error("upstream request failed: {0}")]
    Transport(#[from] ureq::Error),
}

/// Result of fetching a topic from upstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fetched {
    /// Source text of the topic.
    Found(String),
    /// Upstream answered 404.
    NotFound,
    /// Any other non-success answer, passed through to the client.
    Status { status: u16, body: String },
}

/// Fetches topic source by collection-relative path.
pub trait Source: Send + Sync {
    /// Fetch the source of `path` (already carrying its `.adoc` extension).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the upstream cannot be reached.
    fn fetch(&self, path: &str) -> Result<Fetched, SourceError>;
}

/// Source that reads topics from an HTTP(S) base URL.
pub struct HttpSource {
    agent: Agent,
    base_url: String,
}

impl HttpSource {
    /// Create a source rooted at `base_url` with a per-request timeout.
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Source for HttpSource {
    fn fetch(&self, path: &str) -> Result<Fetched, SourceError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "Fetching upstream source");

        let response = self.agent.get(&url).call()?;
        let status = response.status().as_u16();
        let body = response.into_body().read_to_string()?;

        Ok(match status {
            200..=299 => Fetched::Found(body),
            404 => Fetched::NotFound,
            _ => Fetched::Status { status, body },
        })
    }
}
