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

//! Axum HTTP surface: download routes, health and metrics.
//!
//! Layout: `http/router.rs` (`ApiServer`, middleware, lifecycle), `http/download.rs`
//! (download handler), `http/caller.rs` (locale, collection and token extraction),
//! `http/health.rs` (`/health`, `/metrics`), `http/telemetry.rs` (request metrics layer),
//! `state.rs`, `error.rs`.

pub mod error;
mod http;
mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::{ApiServer, RunningServer};
