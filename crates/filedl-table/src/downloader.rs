//! Download orchestration for tables.
//!
//! # Design
//!
//! - Two strictly sequential backend calls: the render request needs the content payload.
//! - No retries; a single backend failure is surfaced to the caller.
//! - Failures are logged here, where the backend context is known, and classified onto
//!   HTTP semantics through [`DownloadError::kind`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::clients::{ContentClient, RenderClient};
use crate::error::{DownloadError, DownloadResult};
use crate::headers::download_headers;
use crate::model::{DownloadRequest, TableDownload};

/// Query parameter naming the output format.
pub const FORMAT_PARAM: &str = "format";
/// Query parameter naming the content resource.
pub const URI_PARAM: &str = "uri";

/// A kind of downloadable file served under `/download/{kind}`.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Conceptual type of file produced; forms part of the request path.
    fn kind(&self) -> &'static str;

    /// Names of the query parameters this downloader requires.
    fn query_parameters(&self) -> &'static [&'static str];

    /// Produce the requested file.
    ///
    /// The returned body is owned by the caller, which must drop it once the response
    /// has been written.
    ///
    /// # Errors
    ///
    /// Returns a [`DownloadError`] classified onto an HTTP status.
    async fn download(&self, request: DownloadRequest) -> DownloadResult<TableDownload>;
}

/// Relays a table definition from the content service through the renderer.
#[derive(Clone)]
pub struct TableDownloader {
    content: Arc<dyn ContentClient>,
    renderer: Arc<dyn RenderClient>,
}

impl TableDownloader {
    /// Construct a downloader over the supplied backend clients.
    #[must_use]
    pub fn new(content: Arc<dyn ContentClient>, renderer: Arc<dyn RenderClient>) -> Self {
        Self { content, renderer }
    }
}

#[async_trait]
impl Downloader for TableDownloader {
    fn kind(&self) -> &'static str {
        "table"
    }

    fn query_parameters(&self) -> &'static [&'static str] {
        &[FORMAT_PARAM, URI_PARAM]
    }

    async fn download(&self, request: DownloadRequest) -> DownloadResult<TableDownload> {
        validate(&request)?;

        let payload = self
            .content
            .get_resource_body(
                request.access_token.as_deref(),
                request.collection_id.as_deref(),
                &request.locale,
                &request.uri,
            )
            .await
            .map_err(|err| {
                error!(error = %err, request = ?request, "error calling content server");
                DownloadError::from_content(request.uri.clone(), err)
            })?;
        debug!(uri = %request.uri, bytes = payload.len(), "fetched table definition");

        let rendered = self
            .renderer
            .post_body(&request.format, payload)
            .await
            .map_err(|err| {
                error!(error = %err, request = ?request, "error calling table renderer");
                DownloadError::Render {
                    format: request.format.clone(),
                    source: err,
                }
            })?;

        Ok(TableDownload {
            status: rendered.status,
            headers: download_headers(rendered.content_type, &request.uri, &request.format),
            body: rendered.body,
        })
    }
}

fn validate(request: &DownloadRequest) -> DownloadResult<()> {
    let format = request.format.is_empty();
    let uri = request.uri.is_empty();
    if format || uri {
        return Err(DownloadError::MissingParameters { format, uri });
    }
    Ok(())
}
