//! HTTP server that converts AsciiDoc topics on request.
//!
//! Every `GET /{*path}` fetches `<path>.adoc` from the configured upstream,
//! converts it with [`blockdoc_renderer`] and answers with block-convention
//! HTML. Fetching and conversion run on the blocking thread pool.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use blockdoc_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         upstream_url: "https://raw.example.com/org/docs/main".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod source;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use blockdoc_config::{Config, ConfigError};
use blockdoc_renderer::{Backend, PageScaffold, SiteBook};
use state::AppState;

pub use error::ServerError;
pub use source::{Fetched, HttpSource, SOURCE_EXTENSION, Source, SourceError};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Base URL topic sources are fetched from.
    pub upstream_url: String,
    /// Upstream request timeout.
    pub upstream_timeout: Duration,
    /// Base URL of the Book that links resolve against.
    pub book_url: String,
    /// Backend for requests without `?backend=`.
    pub default_backend: Backend,
    /// Page scaffold for full-page responses.
    pub scaffold: PageScaffold,
    /// Application version (mixed into ETags).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
            upstream_url: String::new(),
            upstream_timeout: Duration::from_secs(30),
            book_url: "/".to_owned(),
            default_backend: Backend::default(),
            scaffold: PageScaffold::default(),
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener cannot bind.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        source: Arc::new(HttpSource::new(&config.upstream_url, config.upstream_timeout)),
        book: Arc::new(SiteBook::new(config.book_url.clone())),
        default_backend: config.default_backend,
        scaffold: config.scaffold.clone(),
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, upstream = %config.upstream_url, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from a loaded [`Config`].
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] if no valid upstream is configured or
/// the default backend is unknown.
pub fn server_config_from_config(
    config: &Config,
    version: String,
) -> Result<ServerConfig, ConfigError> {
    let upstream = config.require_upstream()?;
    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        upstream_url: upstream.url.clone(),
        upstream_timeout: Duration::from_secs(upstream.timeout_secs),
        book_url: config.book.base_url.clone(),
        default_backend: config.convert.backend()?,
        scaffold: config.page.scaffold(),
        version,
    })
}

#[cfg(test)]
mod tests {
    use blockdoc_config::UpstreamConfig;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_server_config_from_config() {
        let mut config = Config::default();
        config.convert.backend = "html".to_owned();
        config.book.base_url = "https://docs.example.com".to_owned();
        config.upstream = Some(UpstreamConfig {
            url: "https://raw.example.com".to_owned(),
            timeout_secs: 5,
        });

        let server = server_config_from_config(&config, "1.2.3".to_owned()).unwrap();
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 7980);
        assert_eq!(server.upstream_url, "https://raw.example.com");
        assert_eq!(server.upstream_timeout, Duration::from_secs(5));
        assert_eq!(server.book_url, "https://docs.example.com");
        assert_eq!(server.default_backend, Backend::Html5);
        assert_eq!(server.version, "1.2.3");
    }

    #[test]
    fn test_server_config_requires_upstream() {
        let err = server_config_from_config(&Config::default(), String::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
