//! `blockdoc convert` command implementation.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use blockdoc_asciidoc::Attributes;
use blockdoc_config::{CliSettings, Config};
use blockdoc_renderer::{Backend, ConvertOptions, SiteBook, convert};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// AsciiDoc file to convert.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover blockdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Collection-relative path of the topic (default: the file name).
    #[arg(long)]
    topic_path: Option<String>,

    /// Renderer backend: blocks or html5 (default: from config).
    #[arg(short, long)]
    backend: Option<Backend>,

    /// Emit a bare fragment instead of a full page.
    #[arg(long)]
    plain: bool,

    /// Document attribute override (repeatable).
    #[arg(short = 'a', long = "attribute", value_name = "NAME=VALUE", value_parser = parse_attribute)]
    attributes: Vec<(String, String)>,

    /// Base URL links and includes resolve against (overrides config).
    #[arg(long)]
    book_url: Option<String>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading, conversion or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            book_url: self.book_url,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source = fs::read_to_string(&self.file)?;
        let topic_path = self
            .topic_path
            .unwrap_or_else(|| default_topic_path(&self.file));
        let backend = match self.backend {
            Some(backend) => backend,
            None => config.convert.backend()?,
        };

        tracing::info!(
            file = %self.file.display(),
            topic = %topic_path,
            backend = %backend,
            "Converting file"
        );

        let book = SiteBook::new(config.book.base_url.clone());
        let options = ConvertOptions::new(&book, &topic_path)
            .with_backend(backend)
            .with_attributes(self.attributes.into_iter().collect::<Attributes>())
            .with_plain(self.plain)
            .with_scaffold(config.page.scaffold());
        let html = convert(&source, &options)?;

        match &self.output {
            Some(path) => {
                fs::write(path, &html)?;
                Output::new().written(path, html.len());
            }
            None => io::stdout().lock().write_all(html.as_bytes())?,
        }
        Ok(())
    }
}

fn default_topic_path(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse `name=value`; a bare `name` sets the attribute to an empty value.
fn parse_attribute(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg.split_once('=').unwrap_or((arg, ""));
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("attribute name missing in '{arg}'"));
    }
    Ok((name.to_owned(), value.to_owned()))
}
