//! Transport configuration.

use std::time::Duration;

/// Configuration for [`HttpTransport`](crate::HttpTransport).
///
/// Every call is a single exchange. Callers that want retries decide with
/// [`Error::is_retryable`](crate::Error::is_retryable).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Send `Accept-Encoding: gzip, deflate` and inflate replies.
    pub accept_compressed: bool,
    /// Request timeout. A request exceeding it fails with `ErrorKind::Timeout`.
    pub timeout: Duration,
    /// Deadline for establishing a TCP/TLS connection.
    pub connect_timeout: Duration,
    /// How long an unused pooled connection is kept.
    pub pool_idle_timeout: Duration,
    /// Idle connections kept per host.
    pub pool_max_idle_per_host: usize,
    /// Sent as `User-Agent`; defaults to [`USER_AGENT`](crate::USER_AGENT).
    pub user_agent: String,
    /// Emit `debug!` events for each request and response.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            accept_compressed: true,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: crate::USER_AGENT.to_string(),
            enable_tracing: true,
        }
    }
}

impl ClientConfig {
    /// Start from the defaults.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Continue adjusting an existing configuration.
    pub fn to_builder(&self) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: self.clone(),
        }
    }
}

/// Chained setters over a default [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.config.accept_compressed = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    pub fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.accept_compressed);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("sfkit/"));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .with_timeout(Duration::from_secs(60))
            .with_compression(false)
            .with_pool_max_idle(2)
            .with_user_agent("custom-agent/1.0")
            .with_tracing(false)
            .build();

        assert!(!config.accept_compressed);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.pool_max_idle_per_host, 2);
        assert_eq!(config.user_agent, "custom-agent/1.0");
        assert!(!config.enable_tracing);
    }

    #[test]
    fn test_to_builder_keeps_existing_values() {
        let base = ClientConfig::builder()
            .with_user_agent("ci-runner/2")
            .build();
        let config = base.to_builder().with_connect_timeout(Duration::from_secs(3)).build();

        assert_eq!(config.user_agent, "ci-runner/2");
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.timeout, base.timeout);
    }
}
