//! Table renderer client.

use async_trait::async_trait;
use bytes::Bytes;
use filedl_table::{RenderBody, RenderClient, RenderError, RenderedTable};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use crate::base_url::BaseUrl;
use crate::error::BackendResult;

const RENDER_PATH: &str = "render";
const JSON_CONTENT_TYPE: &str = "application/json";

/// `reqwest` client posting table definitions to `{host}/render/{format}`.
#[derive(Debug, Clone)]
pub struct TableRendererClient {
    client: Client,
    base: BaseUrl,
}

impl TableRendererClient {
    /// Create a client for the renderer at `host`.
    ///
    /// # Errors
    ///
    /// Returns an error when `host` cannot carry path segments.
    pub fn new(client: Client, host: Url) -> BackendResult<Self> {
        Ok(Self {
            client,
            base: BaseUrl::new(host)?,
        })
    }

    /// Renderer host the client was created with.
    #[must_use]
    pub const fn host(&self) -> &Url {
        self.base.as_url()
    }
}

#[async_trait]
impl RenderClient for TableRendererClient {
    async fn post_body(&self, format: &str, body: Bytes) -> Result<RenderedTable, RenderError> {
        if format.is_empty() {
            return Err(RenderError::InvalidRequest {
                format: String::new(),
                reason: "empty_format",
            });
        }

        let url = self.base.join([RENDER_PATH, format]);
        debug!(url = %url, bytes = body.len(), "posting table to renderer");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|source| RenderError::Transport {
                format: format.to_string(),
                source: Box::new(source),
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(RenderedTable {
            status,
            content_type,
            body: RenderBody::from_stream(response.bytes_stream()),
        })
    }
}
