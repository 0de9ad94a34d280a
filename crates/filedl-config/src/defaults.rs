//! Variable names and default values.
//!
//! # Design
//! - Keep every name next to its default so the loader and its tests agree.

pub(crate) const BIND_ADDR: &str = "BIND_ADDR";
pub(crate) const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
pub(crate) const SHUTDOWN_TIMEOUT: &str = "SHUTDOWN_TIMEOUT";
pub(crate) const HEALTHCHECK_CRITICAL_TIMEOUT: &str = "HEALTHCHECK_CRITICAL_TIMEOUT";
pub(crate) const HEALTHCHECK_INTERVAL: &str = "HEALTHCHECK_INTERVAL";
pub(crate) const OTEL_BATCH_TIMEOUT: &str = "OTEL_BATCH_TIMEOUT";
pub(crate) const OTEL_EXPORTER_OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
pub(crate) const OTEL_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";
pub(crate) const OTEL_ENABLED: &str = "OTEL_ENABLED";
pub(crate) const TABLE_RENDERER_HOST: &str = "TABLE_RENDERER_HOST";
pub(crate) const CONTENT_SERVER_HOST: &str = "CONTENT_SERVER_HOST";
pub(crate) const API_ROUTER_URL: &str = "API_ROUTER_URL";
pub(crate) const LOG_FORMAT: &str = "LOG_FORMAT";

pub(crate) const DEFAULT_BIND_ADDR: &str = ":23400";
pub(crate) const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "*";
pub(crate) const DEFAULT_SHUTDOWN_TIMEOUT: &str = "5s";
pub(crate) const DEFAULT_HEALTHCHECK_CRITICAL_TIMEOUT: &str = "90s";
pub(crate) const DEFAULT_HEALTHCHECK_INTERVAL: &str = "30s";
pub(crate) const DEFAULT_OTEL_BATCH_TIMEOUT: &str = "5s";
pub(crate) const DEFAULT_OTEL_EXPORTER_OTLP_ENDPOINT: &str = "localhost:4317";
pub(crate) const DEFAULT_OTEL_SERVICE_NAME: &str = "dp-file-downloader";
pub(crate) const DEFAULT_TABLE_RENDERER_HOST: &str = "http://localhost:23300";
pub(crate) const DEFAULT_CONTENT_SERVER_HOST: &str = "http://localhost:8082";
pub(crate) const DEFAULT_API_ROUTER_URL: &str = "http://localhost:23200/v1";
