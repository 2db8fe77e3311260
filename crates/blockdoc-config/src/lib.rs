//! Configuration management for blockdoc.
//!
//! Parses `blockdoc.toml` with serde and discovers it in the current
//! directory or any parent. CLI settings are applied on top of the file
//! values via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `upstream.url`
//! - `book.base_url`

mod expand;

use std::path::{Path, PathBuf};

use blockdoc_renderer::{Backend, PageScaffold};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override (or supply) the upstream source URL.
    pub upstream_url: Option<String>,
    /// Override the Book base URL.
    pub book_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "blockdoc.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// Where source documents are fetched from. Required to serve.
    pub upstream: Option<UpstreamConfig>,
    pub book: BookConfig,
    pub convert: ConvertConfig,
    pub page: PageConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
        }
    }
}

/// Upstream source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL that `<path>.adoc` is appended to.
    pub url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    /// Validate that the upstream is reachable over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the URL is empty or not http(s),
    /// or the timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.url, "upstream.url")?;
        require_http_url(&self.url, "upstream.url")?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "upstream.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Book configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Site URL that collection-relative paths are joined to.
    pub base_url: String,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_owned(),
        }
    }
}

/// Conversion defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Backend used when a request does not name one.
    pub backend: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default().id().to_owned(),
        }
    }
}

impl ConvertConfig {
    /// The configured backend.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the identifier is not recognized.
    pub fn backend(&self) -> Result<Backend, ConfigError> {
        self.backend.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "convert.backend: unknown backend '{}'",
                self.backend
            ))
        })
    }
}

/// Stylesheets and scripts linked from full pages.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        let scaffold = PageScaffold::default();
        Self {
            stylesheets: scaffold.stylesheets,
            scripts: scaffold.scripts,
        }
    }
}

impl PageConfig {
    #[must_use]
    pub fn scaffold(&self) -> PageScaffold {
        PageScaffold {
            stylesheets: self.stylesheets.clone(),
            scripts: self.scripts.clone(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`upstream.url`").
        field: String,
        /// Error message (e.g., "${`DOCS_URL`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `blockdoc.toml` in the current directory and its parents, falling
    /// back to defaults. CLI settings take precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the result is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(url) = &settings.upstream_url {
            match &mut self.upstream {
                Some(upstream) => upstream.url.clone_from(url),
                None => {
                    self.upstream = Some(UpstreamConfig {
                        url: url.clone(),
                        timeout_secs: default_timeout_secs(),
                    });
                }
            }
        }
        if let Some(book_url) = &settings.book_url {
            self.book.base_url.clone_from(book_url);
        }
    }

    /// Get validated upstream configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_upstream(&self) -> Result<&UpstreamConfig, ConfigError> {
        let upstream = self.upstream.as_ref().ok_or_else(|| {
            ConfigError::Validation(
                "[upstream] section or --upstream-url required to serve".into(),
            )
        })?;
        upstream.validate()?;
        Ok(upstream)
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        if let Some(upstream) = &self.upstream {
            upstream.validate()?;
        }
        require_non_empty(&self.book.base_url, "book.base_url")?;
        self.convert.backend()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        if let Some(upstream) = &mut self.upstream {
            upstream.url = expand::expand_env(&upstream.url, "upstream.url")?;
        }
        self.book.base_url = expand::expand_env(&self.book.base_url, "book.base_url")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7980);
        assert!(config.upstream.is_none());
        assert_eq!(config.book.base_url, "/");
        assert_eq!(config.convert.backend().unwrap(), Backend::Blocks);
        assert_eq!(config.page.scaffold(), PageScaffold::default());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 7980);
        assert!(config.upstream.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[upstream]
url = "https://raw.example.com/org/docs/main"
timeout_secs = 5

[book]
base_url = "https://docs.example.com"

[convert]
backend = "html5"

[page]
stylesheets = ["/site.css"]
scripts = []
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        let upstream = config.upstream.as_ref().unwrap();
        assert_eq!(upstream.url, "https://raw.example.com/org/docs/main");
        assert_eq!(upstream.timeout_secs, 5);
        assert_eq!(config.book.base_url, "https://docs.example.com");
        assert_eq!(config.convert.backend().unwrap(), Backend::Html5);
        assert_eq!(config.page.stylesheets, vec!["/site.css"]);
        assert!(config.page.scripts.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_upstream_timeout_defaults() {
        let config: Config = toml::from_str("[upstream]\nurl = \"http://localhost:9000\"").unwrap();
        assert_eq!(config.upstream.unwrap().timeout_secs, 30);
    }

    #[test]
    fn test_upstream_requires_url() {
        let result: Result<Config, _> = toml::from_str("[upstream]\ntimeout_secs = 5");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_explicit_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[server\nport = 1").unwrap();

        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_validates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[convert]\nbackend = \"docbook\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("docbook"));
    }

    #[test]
    fn test_apply_cli_settings_host_and_port() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9090),
            ..Default::default()
        });
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_apply_cli_settings_creates_upstream() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            upstream_url: Some("https://raw.example.com".to_owned()),
            ..Default::default()
        });
        let upstream = config.require_upstream().unwrap();
        assert_eq!(upstream.url, "https://raw.example.com");
        assert_eq!(upstream.timeout_secs, 30);
    }

    #[test]
    fn test_apply_cli_settings_keeps_upstream_timeout() {
        let mut config: Config =
            toml::from_str("[upstream]\nurl = \"https://a.test\"\ntimeout_secs = 3").unwrap();
        config.apply_cli_settings(&CliSettings {
            upstream_url: Some("https://b.test".to_owned()),
            ..Default::default()
        });
        let upstream = config.upstream.unwrap();
        assert_eq!(upstream.url, "https://b.test");
        assert_eq!(upstream.timeout_secs, 3);
    }

    #[test]
    fn test_apply_cli_settings_book_url() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            book_url: Some("https://docs.example.com".to_owned()),
            ..Default::default()
        });
        assert_eq!(config.book.base_url, "https://docs.example.com");
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7980);
        assert!(config.upstream.is_none());
        assert_eq!(config.book.base_url, "/");
    }

    #[test]
    fn test_load_rejects_invalid_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "").unwrap();

        let settings = CliSettings {
            upstream_url: Some("ftp://files.example.com".to_owned()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(err.to_string().contains("upstream.url"));
    }

    #[test]
    fn test_require_upstream_missing() {
        let err = Config::default().require_upstream().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("[upstream]"));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("BLOCKDOC_TEST_UPSTREAM", "https://raw.example.com");
            std::env::remove_var("BLOCKDOC_TEST_BOOK");
        }

        let toml = r#"
[upstream]
url = "${BLOCKDOC_TEST_UPSTREAM}/main"

[book]
base_url = "${BLOCKDOC_TEST_BOOK:-https://docs.example.com}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.upstream.unwrap().url, "https://raw.example.com/main");
        assert_eq!(config.book.base_url, "https://docs.example.com");

        unsafe {
            std::env::remove_var("BLOCKDOC_TEST_UPSTREAM");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("BLOCKDOC_TEST_MISSING_HOST");
        }

        let mut config: Config =
            toml::from_str("[server]\nhost = \"${BLOCKDOC_TEST_MISSING_HOST}\"").unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("BLOCKDOC_TEST_MISSING_HOST"));
        assert!(err.to_string().contains("server.host"));
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let err = config.validate().expect_err("Expected validation to fail");
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(msg.contains(s), "Expected error to contain '{s}', got: {msg}");
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default();
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "cannot be empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default();
        config.server.port = 0;
        assert_validation_error(&config, &["server.port", "cannot be 0"]);
    }

    #[test]
    fn test_validate_upstream_scheme() {
        let mut config = Config::default();
        config.upstream = Some(UpstreamConfig {
            url: "raw.example.com".to_owned(),
            timeout_secs: 30,
        });
        assert_validation_error(&config, &["upstream.url", "http://"]);
    }

    #[test]
    fn test_validate_upstream_timeout_zero() {
        let mut config = Config::default();
        config.upstream = Some(UpstreamConfig {
            url: "https://raw.example.com".to_owned(),
            timeout_secs: 0,
        });
        assert_validation_error(&config, &["upstream.timeout_secs"]);
    }

    #[test]
    fn test_validate_book_base_url_empty() {
        let mut config = Config::default();
        config.book.base_url = String::new();
        assert_validation_error(&config, &["book.base_url"]);
    }

    #[test]
    fn test_validate_backend_aliases() {
        let mut config = Config::default();
        config.convert.backend = "Franklin".to_owned();
        assert!(config.validate().is_ok());

        config.convert.backend = "pdf".to_owned();
        assert_validation_error(&config, &["convert.backend", "pdf"]);
    }
}
