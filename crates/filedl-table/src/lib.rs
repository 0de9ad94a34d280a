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

//! Table download orchestration.
//!
//! Layout: `model.rs` (request, rendered table and download envelope),
//! `clients.rs` (content/render backend traits), `error.rs` (typed failures and
//! their HTTP classification), `headers.rs` (response metadata),
//! `downloader.rs` (the `Downloader` trait and `TableDownloader`).

pub mod clients;
pub mod downloader;
pub mod error;
pub mod headers;
pub mod model;

pub use clients::{ContentClient, RenderClient};
pub use downloader::{Downloader, FORMAT_PARAM, TableDownloader, URI_PARAM};
pub use error::{
    BoxError, ContentError, DownloadError, DownloadErrorKind, DownloadResult, RenderError,
};
pub use headers::{CONTENT_DISPOSITION, CONTENT_TYPE, content_disposition, table_filename};
pub use model::{DownloadRequest, RenderBody, RenderedTable, TableDownload};
