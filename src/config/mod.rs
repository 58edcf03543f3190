//! Runtime configuration for the service and the command-line tool.
//!
//! Everything is read from environment variables with development defaults,
//! so a bare `cargo run --bin api` works against the public relay and DNS
//! endpoints. `Config::from_env` is the only place that touches the process
//! environment; the rest of the crate receives explicit values.

pub mod analysis;

pub use analysis::{AnalysisConfig, ScoringWeights, Thresholds};

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Environment variable names. Public so tests and deploy scripts can refer to them.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_FETCH_RELAY_URL: &str = "FETCH_RELAY_URL";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_DNS_API_URL: &str = "DNS_API_URL";
pub const ENV_SCREENSHOT_SERVICES: &str = "SCREENSHOT_SERVICES";
pub const ENV_SCREENSHOT_TIMEOUT_SECS: &str = "SCREENSHOT_TIMEOUT_SECS";
pub const ENV_CHAT_API_URL: &str = "CHAT_API_URL";
pub const ENV_CHAT_API_KEY: &str = "CHAT_API_KEY";
pub const ENV_CHAT_MODEL: &str = "CHAT_MODEL";
pub const ENV_RUBRIC_PATH: &str = "RUBRIC_PATH";
pub const ENV_RELAY_ALLOW_PRIVATE: &str = "RELAY_ALLOW_PRIVATE";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_FETCH_RELAY_URL: &str = "https://api.allorigins.win/raw?url=";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DNS_API_URL: &str = "https://dns.google/resolve";
const DEFAULT_SCREENSHOT_SERVICES: [&str; 3] = [
    "https://image.thum.io/get/width/800/crop/600/noanimate/",
    "https://api.apiflash.com/v1/urltoimage?access_key=DEMO&url=",
    "https://shot.screenshotapi.net/screenshot?token=DEMO&url=",
];
const DEFAULT_SCREENSHOT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CHAT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_CHAT_MODEL: &str = "openai/gpt-3.5-turbo";

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    fetch_relay_url: Option<String>,
    fetch_timeout: Duration,
    dns_api_url: String,
    screenshot_services: Vec<String>,
    screenshot_timeout: Duration,
    chat_api_url: String,
    chat_api_key: Option<String>,
    chat_model: String,
    rubric_path: Option<String>,
    relay_allow_private: bool,
}

impl Config {
    /// Create a config pointing at the given bind address and relay, with
    /// defaults for everything else.
    pub fn new(bind_addr: impl Into<String>, fetch_relay_url: Option<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            fetch_relay_url,
            ..Self::default()
        }
    }

    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        // An explicitly empty relay means "fetch targets directly".
        let fetch_relay_url = match env::var(ENV_FETCH_RELAY_URL) {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(value.trim().to_string()),
            Err(_) => Some(DEFAULT_FETCH_RELAY_URL.to_string()),
        };

        let fetch_timeout = Duration::from_secs(parse_secs(
            ENV_FETCH_TIMEOUT_SECS,
            DEFAULT_FETCH_TIMEOUT_SECS,
        )?);
        let screenshot_timeout = Duration::from_secs(parse_secs(
            ENV_SCREENSHOT_TIMEOUT_SECS,
            DEFAULT_SCREENSHOT_TIMEOUT_SECS,
        )?);

        let dns_api_url =
            env::var(ENV_DNS_API_URL).unwrap_or_else(|_| DEFAULT_DNS_API_URL.to_string());

        let screenshot_services = match env::var(ENV_SCREENSHOT_SERVICES) {
            Ok(value) => value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => default_screenshot_services(),
        };

        let chat_api_url =
            env::var(ENV_CHAT_API_URL).unwrap_or_else(|_| DEFAULT_CHAT_API_URL.to_string());
        let chat_api_key = env::var(ENV_CHAT_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty());
        let chat_model = env::var(ENV_CHAT_MODEL).unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());
        let rubric_path = env::var(ENV_RUBRIC_PATH).ok().filter(|p| !p.is_empty());
        let relay_allow_private = parse_flag(ENV_RELAY_ALLOW_PRIVATE)?;

        Ok(Self {
            bind_addr,
            fetch_relay_url,
            fetch_timeout,
            dns_api_url,
            screenshot_services,
            screenshot_timeout,
            chat_api_url,
            chat_api_key,
            chat_model,
            rubric_path,
            relay_allow_private,
        })
    }

    /// Load the analysis rubric: the file named by `RUBRIC_PATH` when set,
    /// otherwise the built-in defaults.
    pub fn load_analysis_config(&self) -> Result<AnalysisConfig, ConfigError> {
        let Some(path) = &self.rubric_path else {
            return Ok(AnalysisConfig::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidValue {
            field: ENV_RUBRIC_PATH,
            reason: format!("cannot read {path}: {e}"),
        })?;
        AnalysisConfig::from_json_str(&raw)
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Relay prefix the target URL is appended to, or `None` for direct fetches.
    pub fn fetch_relay_url(&self) -> Option<&str> {
        self.fetch_relay_url.as_deref()
    }
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
    /// DNS-over-HTTPS JSON endpoint used for domain validation.
    pub fn dns_api_url(&self) -> &str {
        &self.dns_api_url
    }
    pub fn screenshot_services(&self) -> &[String] {
        &self.screenshot_services
    }
    pub fn screenshot_timeout(&self) -> Duration {
        self.screenshot_timeout
    }
    pub fn chat_api_url(&self) -> &str {
        &self.chat_api_url
    }
    /// Bearer token for the chat API. The chat endpoint is disabled without one.
    pub fn chat_api_key(&self) -> Option<&str> {
        self.chat_api_key.as_deref()
    }
    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }
    pub fn rubric_path(&self) -> Option<&str> {
        self.rubric_path.as_deref()
    }
    /// Let the relay endpoint reach loopback and private-network addresses.
    pub fn relay_allow_private(&self) -> bool {
        self.relay_allow_private
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            fetch_relay_url: Some(DEFAULT_FETCH_RELAY_URL.to_string()),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            dns_api_url: DEFAULT_DNS_API_URL.to_string(),
            screenshot_services: default_screenshot_services(),
            screenshot_timeout: Duration::from_secs(DEFAULT_SCREENSHOT_TIMEOUT_SECS),
            chat_api_url: DEFAULT_CHAT_API_URL.to_string(),
            chat_api_key: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            rubric_path: None,
            relay_allow_private: false,
        }
    }
}

fn default_screenshot_services() -> Vec<String> {
    DEFAULT_SCREENSHOT_SERVICES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn parse_secs(field: &'static str, default: u64) -> Result<u64, ConfigError> {
    let Ok(raw) = env::var(field) else {
        return Ok(default);
    };
    let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        reason: format!("expected a whole number of seconds, got '{raw}'"),
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(secs)
}

fn parse_flag(field: &'static str) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(field) else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" => Ok(false),
        "1" | "true" | "yes" => Ok(true),
        _ => Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected true or false, got '{raw}'"),
        }),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
