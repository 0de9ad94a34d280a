#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Telemetry primitives for the file downloader.
//!
//! Layout: `init.rs` (subscriber and OpenTelemetry setup), `context.rs` (task-local
//! request context), `layers.rs` (`x-request-id` layers), `metrics.rs` (Prometheus
//! registry), `error.rs`.

pub mod context;
pub mod error;
pub mod init;
pub mod layers;
pub mod metrics;

pub use context::{RequestContext, ServiceSpanGuard, current_request_id};
pub use error::{Result, TelemetryError};
pub use init::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, OpenTelemetryConfig, OpenTelemetryGuard,
    build_sha, init_logging, init_logging_with_otel,
};
pub use layers::{RequestIdLayer, request_id_layer};
pub use metrics::{DownloadOutcome, Metrics};
