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

//! Dependency health checks polled on a fixed interval.
//!
//! Layout: `model.rs` (status, check state, report), `check.rs` (`HealthCheck` runner
//! and aggregation), `error.rs`.

pub mod check;
pub mod error;
pub mod model;

use async_trait::async_trait;

pub use check::{HealthCheck, HealthCheckBuilder};
pub use error::{HealthError, HealthResult};
pub use model::{CheckOutcome, CheckState, HealthReport, Status, VersionInfo};

/// A single dependency probe.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Probe the dependency once.
    async fn check(&self) -> CheckOutcome;
}
