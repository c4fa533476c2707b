//! Analyzer configuration.
//!
//! Defaults point at a locally running analysis service. Every value can be
//! overridden from the environment or with the builder methods.

use std::time::Duration;

/// Default base URL of the analysis service
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default path of the streaming analysis endpoint
pub const DEFAULT_ENDPOINT: &str = "/analyze/stream";

/// Default TCP connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "APIDRIFT_URL";

/// Environment variable overriding the endpoint path
pub const ENV_ENDPOINT: &str = "APIDRIFT_ENDPOINT";

/// Environment variable overriding the connect timeout (seconds)
pub const ENV_CONNECT_TIMEOUT: &str = "APIDRIFT_CONNECT_TIMEOUT_SECS";

/// Configuration for talking to the analysis service.
///
/// # Example
///
/// ```
/// use apidrift::config::AnalyzerConfig;
///
/// let config = AnalyzerConfig::default().with_base_url("http://analyzer:5000/");
/// assert_eq!(config.stream_url(), "http://analyzer:5000/analyze/stream");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Base URL of the service, without the endpoint path
    pub base_url: String,
    /// Path of the streaming endpoint
    pub endpoint: String,
    /// TCP connect timeout. The response itself is long-lived and has no
    /// overall timeout.
    pub connect_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl AnalyzerConfig {
    /// Create a new AnalyzerConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the streaming endpoint path.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Create config from `APIDRIFT_*` environment variables, falling back to
    /// defaults for anything unset. An unparseable timeout is ignored with a
    /// warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url.trim());
            }
        }

        if let Ok(endpoint) = std::env::var(ENV_ENDPOINT) {
            if !endpoint.trim().is_empty() {
                config = config.with_endpoint(endpoint.trim());
            }
        }

        if let Ok(raw) = std::env::var(ENV_CONNECT_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config = config.with_connect_timeout(Duration::from_secs(secs)),
                Err(_) => tracing::warn!(
                    "Ignoring invalid {}={:?}, using {}s",
                    ENV_CONNECT_TIMEOUT,
                    raw,
                    DEFAULT_CONNECT_TIMEOUT_SECS
                ),
            }
        }

        config
    }

    /// Full URL of the streaming endpoint.
    pub fn stream_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.endpoint.starts_with('/') {
            format!("{}{}", base, self.endpoint)
        } else {
            format!("{}/{}", base, self.endpoint)
        }
    }
}
