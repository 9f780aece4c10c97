//! Relay Configuration Settings
//!
//! Configuration types for the relay, loaded from environment variables.

use std::time::Duration;

/// Reference list of tracked author handles, used when
/// `RELAY_TRACKED_AUTHORS` is unset.
pub const DEFAULT_TRACKED_AUTHORS: &[&str] = &[
    "PJ_Matlock",
    "garyblack00",
    "CitronResearch",
    "anandchokkavelu",
    "OphirGottlieb",
    "Beth_Kindig",
    "peterxia_com",
];

/// Default rule-management and streaming API base.
const DEFAULT_API_BASE_URL: &str = "https://api.twitter.com";

/// Default delivery API base.
const DEFAULT_TELEGRAM_BASE_URL: &str = "https://api.telegram.org";

/// API credentials for both remote services.
#[derive(Clone)]
pub struct Credentials {
    bearer_token: String,
    bot_token: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(bearer_token: String, bot_token: String) -> Self {
        Self {
            bearer_token,
            bot_token,
        }
    }

    /// Bearer token for the rule and stream endpoints.
    #[must_use]
    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    /// Bot token for the delivery endpoint.
    #[must_use]
    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("bearer_token", &"[REDACTED]")
            .field("bot_token", &"[REDACTED]")
            .finish()
    }
}

/// Streaming connection settings.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Cool-down before reconnecting after a dropped connection.
    pub cooldown: Duration,
    /// Delay between rate-limited connection attempts.
    pub rate_limit_delay: Duration,
    /// Connection attempts before a rate-limited connect gives up.
    pub max_connect_attempts: u32,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(10),
            rate_limit_delay: Duration::from_secs(10),
            max_connect_attempts: 5,
        }
    }
}

/// Complete relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// API credentials.
    pub credentials: Credentials,
    /// Destination chat identifier.
    pub chat_id: String,
    /// Tracked author handles, in rule order.
    pub tracked_authors: Vec<String>,
    /// Streaming connection settings.
    pub stream: StreamSettings,
    /// Delay before restarting the synchronize-and-stream cycle.
    pub restart_delay: Duration,
    /// Connect timeout applied to every outbound connection.
    pub connect_timeout: Duration,
    /// Total request timeout for rule and delivery calls. The streaming
    /// read deliberately carries no total timeout; idle is its natural
    /// state.
    pub request_timeout: Duration,
    /// Rule-management and streaming API base URL.
    pub api_base_url: String,
    /// Delivery API base URL.
    pub telegram_base_url: String,
}

impl RelayConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required environment variable is missing or
    /// empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bearer_token = require_env("TWITTER_BEARER_TOKEN")?;
        let bot_token = require_env("TELEGRAM_BOT_TOKEN")?;
        let chat_id = require_env("TELEGRAM_CHAT_ID")?;

        let tracked_authors = resolve_authors(
            std::env::var("RELAY_TRACKED_AUTHORS").ok().as_deref(),
            std::env::var("RELAY_EXTRA_AUTHORS").ok().as_deref(),
        );

        let defaults = StreamSettings::default();
        let stream = StreamSettings {
            cooldown: parse_env_duration_secs("RELAY_STREAM_COOLDOWN_SECS", defaults.cooldown),
            rate_limit_delay: parse_env_duration_secs(
                "RELAY_RATE_LIMIT_DELAY_SECS",
                defaults.rate_limit_delay,
            ),
            max_connect_attempts: parse_env_u32(
                "RELAY_MAX_CONNECT_ATTEMPTS",
                defaults.max_connect_attempts,
            ),
        };

        Ok(Self {
            credentials: Credentials::new(bearer_token, bot_token),
            chat_id,
            tracked_authors,
            stream,
            restart_delay: parse_env_duration_secs(
                "RELAY_RESTART_DELAY_SECS",
                Duration::from_secs(10),
            ),
            connect_timeout: parse_env_duration_secs(
                "RELAY_CONNECT_TIMEOUT_SECS",
                Duration::from_secs(10),
            ),
            request_timeout: parse_env_duration_secs(
                "RELAY_REQUEST_TIMEOUT_SECS",
                Duration::from_secs(30),
            ),
            api_base_url: std::env::var("RELAY_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            telegram_base_url: std::env::var("RELAY_TELEGRAM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_TELEGRAM_BASE_URL.to_string()),
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    let value =
        std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))?;
    if value.is_empty() {
        return Err(ConfigError::EmptyValue(key.to_string()));
    }
    Ok(value)
}

/// Combine the tracked-author list (or the default) with any fixed extra
/// entries.
///
/// Extras append after the base list so an operator override of the base
/// list keeps them; duplicate handles are tolerated because rule labels
/// dedupe downstream.
fn resolve_authors(tracked: Option<&str>, extra: Option<&str>) -> Vec<String> {
    let mut authors = tracked.map_or_else(
        || {
            DEFAULT_TRACKED_AUTHORS
                .iter()
                .map(ToString::to_string)
                .collect()
        },
        parse_authors,
    );
    if let Some(extra) = extra {
        authors.extend(parse_authors(extra));
    }
    authors
}

/// Split a comma-separated author list, trimming blanks.
fn parse_authors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|handle| !handle.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}
