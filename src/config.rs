// src/config.rs

//! Configuration types for the pace limiter

// dependencies
use crate::errors::PaceLimiterError;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_WINDOW: Duration = Duration::from_secs(60);
const DEFAULT_REQUEST_LIMIT: u32 = 120;

/// Configuration for rate limiter behavior
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaceLimiterConfig {
    pub(crate) base_url: String,
    #[serde(default = "default_window", with = "humantime_serde")]
    pub(crate) window: Duration,
    #[serde(default = "default_request_limit")]
    pub(crate) request_limit: u32,
}

fn default_window() -> Duration {
    DEFAULT_WINDOW
}

fn default_request_limit() -> u32 {
    DEFAULT_REQUEST_LIMIT
}

impl PaceLimiterConfig {
    /// Create a new configuration for the given base URL, allowing
    /// 120 requests per trailing 60 second window
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            window: DEFAULT_WINDOW,
            request_limit: DEFAULT_REQUEST_LIMIT,
        }
    }

    /// Builder-style: set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builder-style: set the trailing window
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Builder-style: set the maximum number of requests per window
    pub fn request_limit(mut self, request_limit: u32) -> Self {
        self.request_limit = request_limit;
        self
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get_window(&self) -> Duration {
        self.window
    }

    pub fn get_request_limit(&self) -> u32 {
        self.request_limit
    }

    /// Spacing that spreads `request_limit` requests evenly over the window
    pub fn ideal_interval(&self) -> Duration {
        self.window / self.request_limit.max(1)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PaceLimiterError> {
        if self.base_url.is_empty() {
            return Err(PaceLimiterError::InvalidBaseUrl);
        }
        // timestamps are u64 nanoseconds
        if self.window.is_zero() || u64::try_from(self.window.as_nanos()).is_err() {
            return Err(PaceLimiterError::InvalidWindow);
        }
        if self.request_limit == 0 {
            return Err(PaceLimiterError::InvalidRequestLimit);
        }
        Ok(())
    }
}

/// Settings applied to every request a `ReqwestTransport` sends.
///
/// Holds what would otherwise be process-wide constants: the API token
/// and the common headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransportConfig {
    #[serde(default)]
    pub(crate) default_headers: Vec<(String, String)>,
    #[serde(default)]
    pub(crate) bearer_token: Option<String>,
    #[serde(default, with = "humantime_serde")]
    pub(crate) timeout: Option<Duration>,
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
}

impl TransportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: add a header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Builder-style: send `Authorization: Bearer <token>` with every request
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Builder-style: total timeout for each request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
