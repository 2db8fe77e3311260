//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use blockdoc_renderer::{Backend, Book, PageScaffold};

use crate::source::Source;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Where topic sources are fetched from.
    pub(crate) source: Arc<dyn Source>,
    /// Resolves collection-relative paths in links and includes.
    pub(crate) book: Arc<dyn Book>,
    /// Backend used when the request does not name one.
    pub(crate) default_backend: Backend,
    /// Page scaffold for non-plain responses.
    pub(crate) scaffold: PageScaffold,
    /// Application version mixed into ETags.
    pub(crate) version: String,
}
