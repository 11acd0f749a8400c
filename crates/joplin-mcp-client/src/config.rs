//! Configuration for the Joplin Data API client

use std::fmt;
use std::time::Duration;

/// Where the Data API lives and how to talk to it
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the Data API, e.g. `http://127.0.0.1:41184`
    pub base_url: String,
    /// API token appended to every request as `token`
    pub token: String,
    /// Overall timeout per request
    pub timeout: Duration,
    /// Maximum number of idle connections kept per host
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:41184".to_string(),
            token: String::new(),
            timeout: Duration::from_secs(15),
            max_idle_per_host: 10,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_idle_per_host", &self.max_idle_per_host)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for client configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Base URL with any trailing `/` removed
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
    max_idle_per_host: Option<usize>,
}

impl ClientConfigBuilder {
    /// Set the Data API base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the API token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of idle connections per host
    pub fn max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = Some(max);
        self
    }

    /// Build the client configuration
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            token: self.token.unwrap_or(defaults.token),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            max_idle_per_host: self.max_idle_per_host.unwrap_or(defaults.max_idle_per_host),
        }
    }
}
