//! Client configuration.
//!
//! A [`ClientConfig`] is built once, handed to the [`Client`](crate::Client),
//! and never mutated afterwards. It can be assembled with the `with_*`
//! builder methods or loaded from the process environment.
//!
//! # Environment Variables
//!
//! - `YOOKASSA_SHOP_ID` — shop identifier (required)
//! - `YOOKASSA_SECRET_KEY` — secret key (required)
//! - `YOOKASSA_BASE_URL` — API root override
//! - `YOOKASSA_TIMEOUT_MS` — per-attempt timeout
//! - `YOOKASSA_DEBUG` — `1`/`true` logs every request line at `info`
//! - `YOOKASSA_PENDING_MAX_ATTEMPTS`, `YOOKASSA_PENDING_MAX_WAIT_MS` — pending
//!   protocol bounds

use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::constants::{
    DEFAULT_BASE_HOST, DEFAULT_BASE_PATH, DEFAULT_TIMEOUT, ENV_BASE_URL, ENV_DEBUG,
    ENV_PENDING_MAX_ATTEMPTS, ENV_PENDING_MAX_WAIT_MS, ENV_SECRET_KEY, ENV_SHOP_ID,
    ENV_TIMEOUT_MS,
};

/// Errors raised while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    /// An environment variable has a value that cannot be parsed.
    #[error("invalid value {value:?} for {name}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The base URL is not an absolute URL.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
}

/// Bounds on the `202 Accepted` retry loop of one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPolicy {
    /// Maximum number of HTTP attempts, the first one included.
    pub max_attempts: u32,
    /// Maximum cumulative time spent waiting between attempts.
    pub max_wait: Duration,
    /// Delay used when a pending response carries no usable `retry_after`.
    pub default_retry_after: Duration,
}

impl Default for PendingPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            max_wait: Duration::from_secs(300),
            default_retry_after: Duration::from_millis(1800),
        }
    }
}

impl PendingPolicy {
    /// Sets the maximum number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the maximum cumulative wait.
    #[must_use]
    pub const fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Sets the fallback delay for pending responses without `retry_after`.
    #[must_use]
    pub const fn with_default_retry_after(mut self, delay: Duration) -> Self {
        self.default_retry_after = delay;
        self
    }
}

/// Immutable configuration of a [`Client`](crate::Client).
#[derive(Clone)]
pub struct ClientConfig {
    shop_id: String,
    secret_key: String,
    base_url: Url,
    timeout: Duration,
    debug_logging: bool,
    pending: PendingPolicy,
}

impl ClientConfig {
    /// Creates a config for the production API with default settings.
    ///
    /// # Panics
    ///
    /// Never in practice: the built-in base URL is a valid absolute URL.
    #[must_use]
    pub fn new(shop_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        let base_url = Url::parse(&format!("{DEFAULT_BASE_HOST}{DEFAULT_BASE_PATH}"))
            .expect("default base URL is valid");
        Self {
            shop_id: shop_id.into(),
            secret_key: secret_key.into(),
            base_url,
            timeout: DEFAULT_TIMEOUT,
            debug_logging: false,
            pending: PendingPolicy::default(),
        }
    }

    /// Loads a config from the `YOOKASSA_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or any value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Loads a config from `YOOKASSA_*` variables resolved by `lookup`.
    ///
    /// [`from_env`](Self::from_env) passes the process environment; other
    /// sources (a parsed `.env` map, test fixtures) can be plugged in here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or any value
    /// cannot be parsed.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let shop_id = lookup(ENV_SHOP_ID).ok_or(ConfigError::MissingEnv(ENV_SHOP_ID))?;
        let secret_key = lookup(ENV_SECRET_KEY).ok_or(ConfigError::MissingEnv(ENV_SECRET_KEY))?;

        let mut config = Self::new(shop_id, secret_key);

        if let Some(url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&url)?;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_TIMEOUT_MS)? {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(value) = lookup(ENV_DEBUG) {
            config.debug_logging = parse_flag(&value).ok_or(ConfigError::InvalidEnv {
                name: ENV_DEBUG,
                value,
            })?;
        }
        if let Some(attempts) = parse_var::<u32>(&lookup, ENV_PENDING_MAX_ATTEMPTS)? {
            config.pending.max_attempts = attempts;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_PENDING_MAX_WAIT_MS)? {
            config.pending.max_wait = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Overrides the API root (scheme, host and versioned path prefix).
    ///
    /// A trailing slash is added when missing so that relative paths are
    /// appended to the prefix instead of replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if `url` is not an absolute URL.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let mut normalized = url.trim_end_matches('/').to_owned();
        normalized.push('/');
        self.base_url = Url::parse(&normalized).map_err(|source| ConfigError::InvalidBaseUrl {
            url: url.to_owned(),
            source,
        })?;
        Ok(self)
    }

    /// Overrides host and path prefix separately.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the combination is not an
    /// absolute URL.
    pub fn with_endpoint(self, host: &str, path: &str) -> Result<Self, ConfigError> {
        let host = host.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        self.with_base_url(&format!("{host}/{path}"))
    }

    /// Sets the timeout applied to each HTTP attempt.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables request-line logging at `info` level.
    #[must_use]
    pub const fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// Sets the bounds of the pending retry loop.
    #[must_use]
    pub const fn with_pending_policy(mut self, policy: PendingPolicy) -> Self {
        self.pending = policy;
        self
    }

    /// Returns the shop identifier.
    #[must_use]
    pub fn shop_id(&self) -> &str {
        &self.shop_id
    }

    /// Returns the secret key.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Returns the API root, always ending in `/`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether request-line logging is enabled.
    #[must_use]
    pub const fn debug_logging(&self) -> bool {
        self.debug_logging
    }

    /// Returns the pending retry policy.
    #[must_use]
    pub const fn pending(&self) -> &PendingPolicy {
        &self.pending
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("shop_id", &self.shop_id)
            .field("has_secret_key", &!self.secret_key.is_empty())
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("debug_logging", &self.debug_logging)
            .field("pending", &self.pending)
            .finish()
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
        None => Ok(None),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
