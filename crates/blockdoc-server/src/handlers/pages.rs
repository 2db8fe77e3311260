//! Topic conversion endpoint.
//!
//! `GET /{*path}` fetches `<path>.adoc` from upstream and answers with the
//! converted HTML. Query parameters select the backend (`backend=`), request
//! a bare fragment (`plain=true`) and override document attributes
//! (`attr-<name>=<value>`).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use blockdoc_asciidoc::Attributes;
use blockdoc_renderer::{Backend, ConvertOptions, convert};
use md5::{Digest, Md5};

use crate::error::ServerError;
use crate::source::{Fetched, SOURCE_EXTENSION};
use crate::state::AppState;

const ATTRIBUTE_PREFIX: &str = "attr-";

/// Conversion request decoded from the route path and query.
#[derive(Debug, PartialEq, Eq)]
struct PageRequest {
    topic_path: String,
    backend: Backend,
    plain: bool,
    attributes: Attributes,
}

impl PageRequest {
    fn new(
        path: &str,
        params: &[(String, String)],
        default_backend: Backend,
    ) -> Result<Self, ServerError> {
        let path = path.trim_start_matches('/');
        let topic_path = if path.ends_with(SOURCE_EXTENSION) {
            path.to_owned()
        } else {
            format!("{path}{SOURCE_EXTENSION}")
        };

        let mut request = Self {
            topic_path,
            backend: default_backend,
            plain: false,
            attributes: Attributes::new(),
        };
        for (name, value) in params {
            if name == "backend" {
                request.backend = value.parse()?;
            } else if name == "plain" {
                request.plain = value.eq_ignore_ascii_case("true");
            } else if let Some(attribute) = name.strip_prefix(ATTRIBUTE_PREFIX)
                && !attribute.is_empty()
            {
                request.attributes.insert(attribute.to_owned(), value.clone());
            }
        }
        Ok(request)
    }

    /// Fetch and convert. A found source comes back as `Fetched::Found(html)`.
    fn run(self, state: &AppState) -> Result<Fetched, ServerError> {
        let source = match state.source.fetch(&self.topic_path)? {
            Fetched::Found(source) => source,
            other => return Ok(other),
        };
        let options = ConvertOptions::new(state.book.as_ref(), &self.topic_path)
            .with_backend(self.backend)
            .with_attributes(self.attributes)
            .with_plain(self.plain)
            .with_scaffold(state.scaffold.clone());
        Ok(Fetched::Found(convert(&source, &options)?))
    }
}

/// Handle GET /{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let request = PageRequest::new(&path, &params, state.default_backend)?;
    let topic_path = request.topic_path.clone();

    let worker = Arc::clone(&state);
    let outcome = tokio::task::spawn_blocking(move || request.run(&worker)).await??;

    let html = match outcome {
        Fetched::Found(html) => html,
        Fetched::NotFound => return Ok((StatusCode::NOT_FOUND, "not found").into_response()),
        Fetched::Status { status, body } => {
            tracing::warn!(path = %topic_path, status, "Upstream returned an error status");
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            return Ok((status, body).into_response());
        }
    };

    let etag = compute_etag(&state.version, &html);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_owned()),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        html,
    )
        .into_response())
}

/// Compute `ETag` from version and content: MD5 truncated to 16 hex chars.
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
