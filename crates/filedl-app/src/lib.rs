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

//! Application wiring for the table download relay.
//!
//! Layout: `bootstrap.rs` (config, telemetry and service wiring), `error.rs` (bootstrap errors).

/// Application bootstrap and lifecycle.
pub mod bootstrap;
/// Bootstrap error types.
pub mod error;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
