//! Configuration management.
//!
//! Settings come from an optional TOML file and `TAVILY_*` environment
//! variables, with the environment taking precedence:
//!
//! | Variable | File key | Default |
//! |---|---|---|
//! | `TAVILY_API_KEY` | `api_key` | required |
//! | `TAVILY_API_BASE_URL` | `api_base_url` | `https://api.tavily.com` |
//! | `TAVILY_MCP_HOST` | `mcp_host` | `0.0.0.0` |
//! | `TAVILY_MCP_PORT` | `mcp_port` | `8000` |
//! | `TAVILY_MCP_TIMEOUT_SECS` | `mcp_timeout_secs` | `60` |
//! | `TAVILY_MCP_CONNECT_TIMEOUT_SECS` | `mcp_connect_timeout_secs` | `10` |
//!
//! The configuration is built once at startup and passed into the provider;
//! nothing re-reads it afterwards.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::provider::DEFAULT_API_BASE_URL;
use crate::utils::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TAVILY";

/// Default SSE listen host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default SSE listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Resolved application configuration
#[derive(Clone, PartialEq)]
pub struct Config {
    /// Tavily API credential
    pub api_key: String,

    /// Base URL of the Tavily REST API
    pub api_base_url: String,

    /// Host to bind in SSE mode
    pub host: String,

    /// Port to bind in SSE mode
    pub port: u16,

    /// Total timeout for one provider request
    pub request_timeout: Duration,

    /// Timeout for establishing a provider connection
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl Config {
    /// Address to bind in SSE mode
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Override the provider request timeout, e.g. from `--timeout`
    pub fn set_request_timeout_secs(&mut self, secs: u64) -> Result<(), ConfigError> {
        self.request_timeout = timeout_or_default(Some(secs), self.request_timeout, "--timeout")?;
        Ok(())
    }
}

/// Unresolved settings as read from file and environment
#[derive(Debug, Clone, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    api_key: Option<String>,

    #[serde(default)]
    api_base_url: Option<String>,

    #[serde(default)]
    mcp_host: Option<String>,

    /// Kept as text so an unparsable value can fall back to the default
    #[serde(default)]
    mcp_port: Option<String>,

    #[serde(default)]
    mcp_timeout_secs: Option<u64>,

    #[serde(default)]
    mcp_connect_timeout_secs: Option<u64>,
}

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TAVILY_API_KEY is not set; a Tavily API key is required")]
    MissingApiKey,

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid {name}: timeout must be greater than zero")]
    InvalidTimeout { name: &'static str },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Load configuration from an optional file plus the process environment.
///
/// When `path` is `None` the default location is used if it exists.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map(Path::to_path_buf).or_else(find_config_file);
    load_from_sources(path.as_deref(), None)
}

/// Load configuration from an optional file and an explicit environment map.
///
/// Passing `None` for `env` reads the process environment.
pub fn load_from_sources(
    path: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        tracing::debug!("Loading config file {}", path.display());
        builder = builder.add_source(config::File::from(path).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .source(env),
    );

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    resolve(raw)
}

fn resolve(raw: RawSettings) -> Result<Config, ConfigError> {
    let api_key = raw
        .api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or(ConfigError::MissingApiKey)?;

    let api_base_url = raw
        .api_base_url
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    validate_base_url(&api_base_url)?;

    let port = match raw.mcp_port.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_PORT,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Ignoring invalid TAVILY_MCP_PORT '{}', using {}",
                value,
                DEFAULT_PORT
            );
            DEFAULT_PORT
        }),
    };

    let request_timeout = timeout_or_default(
        raw.mcp_timeout_secs,
        DEFAULT_REQUEST_TIMEOUT,
        "TAVILY_MCP_TIMEOUT_SECS",
    )?;
    let connect_timeout = timeout_or_default(
        raw.mcp_connect_timeout_secs,
        DEFAULT_CONNECT_TIMEOUT,
        "TAVILY_MCP_CONNECT_TIMEOUT_SECS",
    )?;

    Ok(Config {
        api_key,
        api_base_url,
        host: raw.mcp_host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port,
        request_timeout,
        connect_timeout,
    })
}

fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let parsed = url::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

fn timeout_or_default(
    secs: Option<u64>,
    default: Duration,
    name: &'static str,
) -> Result<Duration, ConfigError> {
    match secs {
        None => Ok(default),
        Some(0) => Err(ConfigError::InvalidTimeout { name }),
        Some(secs) => Ok(Duration::from_secs(secs)),
    }
}

/// Default config file location (`<config dir>/tavily-mcp/config.toml`), if it exists
pub fn find_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("tavily-mcp").join("config.toml");
    path.is_file().then_some(path)
}
