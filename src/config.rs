use std::time::Duration;

use thiserror::Error;

use crate::constants::{DEFAULT_MAX_POST_COUNT, DEFAULT_TITLE_MAX_LENGTH, TELEGRAM_ORIGIN};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Public address of this service, used for self links in feeds
    pub hosting_url: String,

    // Web Server
    pub web_host: String,
    pub web_port: u16,

    // Telegram
    pub telegram_base_url: String,
    pub fetch_timeout: Duration,
    pub probe_timeout: Duration,

    // Request limits
    pub max_post_count: usize,
    pub default_title_max_length: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric environment variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            hosting_url: hosting_url_from_env(),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,

            // Telegram
            telegram_base_url: env_or_default("TELEGRAM_BASE_URL", TELEGRAM_ORIGIN),
            fetch_timeout: Duration::from_secs(parse_env_u64("FETCH_TIMEOUT_SECS", 30)?),
            probe_timeout: Duration::from_secs(parse_env_u64("PROBE_TIMEOUT_SECS", 10)?),

            // Request limits
            max_post_count: parse_env_usize("MAX_POST_COUNT", DEFAULT_MAX_POST_COUNT)?,
            default_title_max_length: parse_env_usize(
                "DEFAULT_TITLE_MAX_LENGTH",
                DEFAULT_TITLE_MAX_LENGTH,
            )?,
        })
    }

    /// Configuration with defaults and no hosting URL, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            hosting_url: String::new(),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
            telegram_base_url: TELEGRAM_ORIGIN.to_string(),
            fetch_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(2),
            max_post_count: DEFAULT_MAX_POST_COUNT,
            default_title_max_length: DEFAULT_TITLE_MAX_LENGTH,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_post_count == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_POST_COUNT".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.default_title_max_length == 0 {
            return Err(ConfigError::InvalidValue {
                name: "DEFAULT_TITLE_MAX_LENGTH".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Err(e) = url::Url::parse(&self.telegram_base_url) {
            return Err(ConfigError::InvalidValue {
                name: "TELEGRAM_BASE_URL".to_string(),
                message: e.to_string(),
            });
        }
        Ok(())
    }

    /// Self link of the feed for `channel`, e.g. `https://host/rss/durov`.
    #[must_use]
    pub fn feed_url(&self, channel: &str) -> String {
        format!("{}/rss/{channel}", self.hosting_url.trim_end_matches('/'))
    }
}

/// Resolve the public base URL, trying the variables set by common hosts in turn.
fn hosting_url_from_env() -> String {
    optional_env("HOSTING_URL")
        .or_else(|| optional_env("URL"))
        .or_else(|| optional_env("VERCEL_PROJECT_PRODUCTION_URL").map(|d| format!("https://{d}")))
        .or_else(|| optional_env("VERCEL_URL").map(|d| format!("https://{d}")))
        .unwrap_or_default()
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
