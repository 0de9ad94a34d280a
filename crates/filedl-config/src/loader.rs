//! Environment lookup.
//!
//! # Design
//! - Every variable is optional; unset or empty values fall back to defaults.
//! - Lookups go through a closure so tests never touch the process environment.

use crate::defaults::{
    API_ROUTER_URL, BIND_ADDR, CONTENT_SERVER_HOST, CORS_ALLOWED_ORIGINS, DEFAULT_API_ROUTER_URL,
    DEFAULT_BIND_ADDR, DEFAULT_CONTENT_SERVER_HOST, DEFAULT_CORS_ALLOWED_ORIGINS,
    DEFAULT_HEALTHCHECK_CRITICAL_TIMEOUT, DEFAULT_HEALTHCHECK_INTERVAL, DEFAULT_OTEL_BATCH_TIMEOUT,
    DEFAULT_OTEL_EXPORTER_OTLP_ENDPOINT, DEFAULT_OTEL_SERVICE_NAME, DEFAULT_SHUTDOWN_TIMEOUT,
    DEFAULT_TABLE_RENDERER_HOST, HEALTHCHECK_CRITICAL_TIMEOUT, HEALTHCHECK_INTERVAL, LOG_FORMAT,
    OTEL_BATCH_TIMEOUT, OTEL_ENABLED, OTEL_EXPORTER_OTLP_ENDPOINT, OTEL_SERVICE_NAME,
    SHUTDOWN_TIMEOUT, TABLE_RENDERER_HOST,
};
use crate::error::ConfigResult;
use crate::model::{OtelSettings, ServiceConfig};
use crate::validate::{
    parse_bind_addr, parse_duration, parse_flag, parse_log_format, parse_origins, parse_url,
};

impl ServiceConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first variable holding an invalid value.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a variable.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first variable holding an invalid value.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str, default: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            bind_addr: parse_bind_addr(BIND_ADDR, &read(BIND_ADDR, DEFAULT_BIND_ADDR))?,
            cors_allowed_origins: parse_origins(&read(
                CORS_ALLOWED_ORIGINS,
                DEFAULT_CORS_ALLOWED_ORIGINS,
            )),
            shutdown_timeout: parse_duration(
                SHUTDOWN_TIMEOUT,
                &read(SHUTDOWN_TIMEOUT, DEFAULT_SHUTDOWN_TIMEOUT),
            )?,
            healthcheck_critical_timeout: parse_duration(
                HEALTHCHECK_CRITICAL_TIMEOUT,
                &read(
                    HEALTHCHECK_CRITICAL_TIMEOUT,
                    DEFAULT_HEALTHCHECK_CRITICAL_TIMEOUT,
                ),
            )?,
            healthcheck_interval: parse_duration(
                HEALTHCHECK_INTERVAL,
                &read(HEALTHCHECK_INTERVAL, DEFAULT_HEALTHCHECK_INTERVAL),
            )?,
            table_renderer_host: parse_url(
                TABLE_RENDERER_HOST,
                &read(TABLE_RENDERER_HOST, DEFAULT_TABLE_RENDERER_HOST),
            )?,
            content_server_host: parse_url(
                CONTENT_SERVER_HOST,
                &read(CONTENT_SERVER_HOST, DEFAULT_CONTENT_SERVER_HOST),
            )?,
            api_router_url: parse_url(
                API_ROUTER_URL,
                &read(API_ROUTER_URL, DEFAULT_API_ROUTER_URL),
            )?,
            log_format: parse_log_format(LOG_FORMAT, &read(LOG_FORMAT, ""))?,
            otel: OtelSettings {
                enabled: parse_flag(OTEL_ENABLED, &read(OTEL_ENABLED, "false"))?,
                endpoint: read(
                    OTEL_EXPORTER_OTLP_ENDPOINT,
                    DEFAULT_OTEL_EXPORTER_OTLP_ENDPOINT,
                ),
                service_name: read(OTEL_SERVICE_NAME, DEFAULT_OTEL_SERVICE_NAME),
                batch_timeout: parse_duration(
                    OTEL_BATCH_TIMEOUT,
                    &read(OTEL_BATCH_TIMEOUT, DEFAULT_OTEL_BATCH_TIMEOUT),
                )?,
            },
        })
    }
}
