//! Conversion error types.

use blockdoc_asciidoc::ParseError;

/// Error returned by [`convert`](crate::convert).
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Source text could not be parsed.
    #[error("failed to parse source: {0}")]
    Parse(#[from] ParseError),

    /// Backend identifier is not recognized.
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    /// Normalized HTML tree could not be serialized.
    #[error("failed to serialize HTML: {0}")]
    Serialize(#[from] std::io::Error),
}
