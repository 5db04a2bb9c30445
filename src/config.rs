//! Gateway endpoint configuration and connection-URL derivation.

use std::time::Duration;

/// Default gateway address when none is configured.
pub const DEFAULT_HOST_PORT: &str = "127.0.0.1:8083";

/// Default catalog selected right after session creation.
pub const DEFAULT_CATALOG: &str = "default_catalog";

/// Configuration for one gateway discovery session.
///
/// Timeouts and pauses are all injectable so tests run without wall-clock
/// delay.
///
/// # Example
///
/// ```
/// use flink_gateway_rs::GatewayConfig;
/// use std::time::Duration;
///
/// let config = GatewayConfig::new("flink-gw:8083", "default_catalog")
///     .with_database("sales")
///     .with_retry_interval(Duration::from_millis(500));
///
/// assert_eq!(config.sessions_url(), "http://flink-gw:8083/v1/sessions");
/// ```
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway address as "host:port".
    pub host_port: String,
    /// Catalog the session works in.
    pub catalog: String,
    /// Optional single database the discovery pass is scoped to.
    pub database: Option<String>,
    /// TCP connect timeout applied to every HTTP call.
    pub connect_timeout: Duration,
    /// Total per-request timeout applied to every HTTP call.
    pub request_timeout: Duration,
    /// Maximum number of result polls per statement.
    pub max_retries: u32,
    /// Fixed pause between result polls.
    pub retry_interval: Duration,
    /// Pause after a context-switching `USE` statement. The gateway applies
    /// the switch asynchronously relative to the HTTP response.
    pub settle_delay: Duration,
}

impl GatewayConfig {
    /// Create a configuration for the given gateway address and catalog.
    pub fn new(host_port: impl Into<String>, catalog: impl Into<String>) -> Self {
        Self {
            host_port: host_port.into(),
            catalog: catalog.into(),
            database: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_retries: 30,
            retry_interval: Duration::from_secs(1),
            settle_delay: Duration::from_secs(1),
        }
    }

    /// Scope the discovery pass to a single known database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the TCP connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the result-poll cap.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the pause between result polls.
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Set the pause after a `USE` statement.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Sessions endpoint URL derived from the gateway address.
    pub fn sessions_url(&self) -> String {
        format!("http://{}/v1/sessions", self.host_port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST_PORT, DEFAULT_CATALOG)
    }
}
