//! Typed service configuration.

use std::net::SocketAddr;
use std::time::Duration;

use tracing::info;
use url::Url;

/// OpenTelemetry exporter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtelSettings {
    /// Whether spans are exported at all.
    pub enabled: bool,
    /// OTLP collector endpoint.
    pub endpoint: String,
    /// Service name attached to exported spans.
    pub service_name: String,
    /// Maximum delay between span batch exports.
    pub batch_timeout: Duration,
}

/// Everything the service reads from its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Origins allowed by CORS; `*` allows any.
    pub cors_allowed_origins: Vec<String>,
    /// Deadline for graceful shutdown.
    pub shutdown_timeout: Duration,
    /// How long a check may stay critical before the service reports critical.
    pub healthcheck_critical_timeout: Duration,
    /// Interval between health polls.
    pub healthcheck_interval: Duration,
    /// Table renderer base URL.
    pub table_renderer_host: Url,
    /// Legacy content server URL. Content is read through the API router.
    pub content_server_host: Url,
    /// API router base URL used for content lookups and health.
    pub api_router_url: Url,
    /// Explicit log format (`json` or `pretty`), inferred from the build when unset.
    pub log_format: Option<String>,
    /// Tracing export settings.
    pub otel: OtelSettings,
}

impl ServiceConfig {
    /// Whether CORS should allow any origin.
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|origin| origin == "*")
    }

    /// Write every value to the log.
    pub fn log(&self) {
        info!(
            bind_addr = %self.bind_addr,
            cors_allowed_origins = ?self.cors_allowed_origins,
            shutdown_timeout = ?self.shutdown_timeout,
            healthcheck_critical_timeout = ?self.healthcheck_critical_timeout,
            healthcheck_interval = ?self.healthcheck_interval,
            table_renderer_host = %self.table_renderer_host,
            content_server_host = %self.content_server_host,
            api_router_url = %self.api_router_url,
            log_format = ?self.log_format,
            otel_enabled = self.otel.enabled,
            otel_endpoint = %self.otel.endpoint,
            otel_service_name = %self.otel.service_name,
            otel_batch_timeout = ?self.otel.batch_timeout,
            "config on startup"
        );
    }
}
