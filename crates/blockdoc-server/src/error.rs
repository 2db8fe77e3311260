//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use blockdoc_renderer::ConvertError;

use crate::source::SourceError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Upstream could not be reached.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Conversion failed or was requested with bad options.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// Blocking conversion task panicked or was cancelled.
    #[error("conversion task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Source(_) => StatusCode::BAD_GATEWAY,
            Self::Convert(ConvertError::UnknownBackend(_)) => StatusCode::BAD_REQUEST,
            Self::Convert(ConvertError::Parse(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Convert(ConvertError::Serialize(_)) | Self::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, status = status.as_u16(), "Request failed");
        }
        (status, self.to_string()).into_response()
    }
}
