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

//! Shared test helpers used across crate and integration suites.
//! Layout: fixtures.rs (canonical request/response values), mocks.rs (recording backend clients).

pub mod fixtures;
pub mod mocks;

pub use mocks::{ContentCall, RenderCall, StubContentClient, StubRenderClient};
