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

//! `reqwest` implementations of the backend clients used by table downloads.
//!
//! Layout: `content.rs` (content service), `renderer.rs` (table renderer),
//! `health.rs` (upstream `/health` probes), `base_url.rs` (base URL handling), `error.rs`.

mod base_url;
pub mod content;
pub mod error;
pub mod health;
pub mod renderer;

use std::time::Duration;

use reqwest::Client;

pub use content::ContentServerClient;
pub use error::{BackendError, BackendResult};
pub use health::HttpHealthProbe;
pub use renderer::TableRendererClient;

/// Header carrying the caller's access token to the content service.
pub const HEADER_ACCESS_TOKEN: &str = "X-Florence-Token";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client shared by the backend clients.
///
/// Only the connect phase is bounded; rendered bodies stream for as long as the renderer
/// keeps sending.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_http_client() -> BackendResult<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|source| BackendError::ClientBuild { source })
}
