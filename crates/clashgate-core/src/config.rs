use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::error::ConfigError;
use crate::retry::{Backoff, RetryConfig};

pub const DEFAULT_BASE_URL: &str = "https://api.clashofclans.com/v1";

const ENV_TOKEN: &str = "COC_API_TOKEN";
const ENV_BASE_URL: &str = "COC_BASE_URL";
const ENV_TIMEOUT: &str = "COC_TIMEOUT_SECS";
const ENV_MAX_RETRIES: &str = "COC_MAX_RETRIES";
const ENV_CACHE_TTL: &str = "COC_CACHE_TTL_SECS";
const ENV_CACHE_ENABLED: &str = "COC_CACHE_ENABLED";

/// Client construction options.
///
/// The token is validated once here; every other field has a working default.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    token: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    pub cache_enabled: bool,
    pub cache_ttl: Duration,
}

impl ClientConfig {
    pub fn new(token: impl AsRef<str>) -> Result<Self, ConfigError> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(Self {
            token: token.to_owned(),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            backoff_base: Duration::from_millis(500),
            backoff_max: Duration::from_secs(8),
            cache_enabled: true,
            cache_ttl: Duration::from_secs(30),
        })
    }

    /// Read configuration from `COC_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(ENV_TOKEN).ok_or(ConfigError::MissingToken)?;
        let mut config = Self::new(token)?;

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(base_url)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            config.timeout = parse_seconds(ENV_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            config.max_retries = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_MAX_RETRIES,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(ENV_CACHE_TTL) {
            config.cache_ttl = parse_seconds(ENV_CACHE_TTL, &raw)?;
        }
        if let Some(raw) = lookup(ENV_CACHE_ENABLED) {
            config.cache_enabled = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: ENV_CACHE_ENABLED,
                        value: raw,
                    })
                }
            };
        }

        Ok(config)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        let trimmed = base_url.as_ref().trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        self.base_url = trimmed.to_owned();
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.backoff_base = base;
        self.backoff_max = max;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.max_retries = retry.max_retries;
        self.backoff_base = retry.backoff.base;
        self.backoff_max = retry.backoff.max;
        self
    }

    pub fn with_cache(mut self, enabled: bool, ttl: Duration) -> Self {
        self.cache_enabled = enabled;
        self.cache_ttl = ttl;
        self
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(
            self.max_retries,
            Backoff::new(self.backoff_base, self.backoff_max),
        )
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("backoff_base", &self.backoff_base)
            .field("backoff_max", &self.backoff_max)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

fn parse_seconds(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
        .ok_or_else(|| ConfigError::InvalidEnv {
            name,
            value: raw.to_owned(),
        })
}
