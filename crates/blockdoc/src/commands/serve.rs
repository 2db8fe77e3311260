//! `blockdoc serve` command implementation.

use std::path::PathBuf;

use blockdoc_config::{CliSettings, Config};
use blockdoc_server::{run_server, server_config_from_config};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover blockdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Base URL topic sources are fetched from (overrides config).
    #[arg(long, env = "BLOCKDOC_UPSTREAM_URL")]
    upstream_url: Option<String>,

    /// Base URL links and includes resolve against (overrides config).
    #[arg(long)]
    book_url: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            upstream_url: self.upstream_url,
            book_url: self.book_url,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let server_config = server_config_from_config(&config, version.to_owned())?;

        output.field(
            "Listening",
            format!("{}:{}", server_config.host, server_config.port),
        );
        output.field("Upstream", &server_config.upstream_url);
        output.field("Book URL", &server_config.book_url);
        output.field("Default backend", server_config.default_backend);

        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
