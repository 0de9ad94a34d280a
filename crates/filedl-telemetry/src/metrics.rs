//! Prometheus metrics registry.
//!
//! # Design
//! - One registry per process, shared through a cheap `Clone` handle.
//! - Label values are bounded: routes come from the router, kinds from registered
//!   downloaders, services from a fixed set of upstream names.

use std::sync::Arc;

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::{Result, TelemetryError};

/// Final state of a download request, used as the `outcome` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The renderer response was relayed.
    Success,
    /// Rejected as a caller error.
    BadRequest,
    /// Content was missing upstream.
    NotFound,
    /// An upstream failed.
    Error,
}

impl DownloadOutcome {
    /// Label value recorded for this outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }
}

/// Prometheus-backed metrics registry.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    downloads_total: IntCounterVec,
    upstream_failures_total: IntCounterVec,
}

fn counter_vec(name: &'static str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::MetricsCollector { name, source })
}

fn register(registry: &Registry, name: &'static str, collector: &IntCounterVec) -> Result<()> {
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })
}

impl Metrics {
    /// Construct a registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any collector cannot be built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = counter_vec(
            "http_requests_total",
            "Total HTTP requests received",
            &["route", "code"],
        )?;
        let downloads_total = counter_vec(
            "downloads_total",
            "Download requests by downloader kind and outcome",
            &["kind", "outcome"],
        )?;
        let upstream_failures_total = counter_vec(
            "upstream_failures_total",
            "Failed calls to upstream services",
            &["service"],
        )?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "downloads_total", &downloads_total)?;
        register(&registry, "upstream_failures_total", &upstream_failures_total)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                downloads_total,
                upstream_failures_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        let code = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[route, code.as_str()])
            .inc();
    }

    /// Count a finished download.
    pub fn inc_download(&self, kind: &str, outcome: DownloadOutcome) {
        self.inner
            .downloads_total
            .with_label_values(&[kind, outcome.as_str()])
            .inc();
    }

    /// Count a failed call to an upstream service.
    pub fn inc_upstream_failure(&self, service: &str) {
        self.inner
            .upstream_failures_total
            .with_label_values(&[service])
            .inc();
    }

    /// Render the registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or are not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_render_with_labels() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.inc_http_request("/download/{kind}", 200);
        metrics.inc_download("table", DownloadOutcome::Success);
        metrics.inc_download("table", DownloadOutcome::NotFound);
        metrics.inc_upstream_failure("renderer");

        let rendered = metrics.render()?;
        assert!(rendered.contains(r#"http_requests_total{code="200",route="/download/{kind}"} 1"#));
        assert!(rendered.contains(r#"downloads_total{kind="table",outcome="success"} 1"#));
        assert!(rendered.contains(r#"downloads_total{kind="table",outcome="not_found"} 1"#));
        assert!(rendered.contains(r#"upstream_failures_total{service="renderer"} 1"#));
        Ok(())
    }

    #[test]
    fn registries_are_independent() -> Result<()> {
        let first = Metrics::new()?;
        let second = Metrics::new()?;
        first.inc_upstream_failure("content");
        assert!(!second.render()?.contains("service=\"content\""));
        Ok(())
    }
}
