//! Content service client.
//!
//! # Design
//!
//! - Resources are read from `{base}/resource[/{collection}]?uri=..&lang=..`.
//! - Only a `200 OK` yields a body; every other status is surfaced with its code so the
//!   orchestrator can classify it.

use async_trait::async_trait;
use bytes::Bytes;
use filedl_table::{ContentClient, ContentError};
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::HEADER_ACCESS_TOKEN;
use crate::base_url::BaseUrl;
use crate::error::BackendResult;

const RESOURCE_PATH: &str = "resource";

/// `reqwest` client for the content service, addressed through the API router.
#[derive(Debug, Clone)]
pub struct ContentServerClient {
    client: Client,
    base: BaseUrl,
}

impl ContentServerClient {
    /// Create a client rooted at `base_url` (for example `http://localhost:23200/v1`).
    ///
    /// # Errors
    ///
    /// Returns an error when `base_url` cannot carry path segments.
    pub fn new(client: Client, base_url: Url) -> BackendResult<Self> {
        Ok(Self {
            client,
            base: BaseUrl::new(base_url)?,
        })
    }

    /// Base URL the client was created with.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.base.as_url()
    }

    fn resource_url(&self, collection_id: Option<&str>, locale: &str, uri: &str) -> Url {
        let segments = std::iter::once(RESOURCE_PATH).chain(collection_id);
        let mut url = self.base.join(segments);
        url.query_pairs_mut()
            .append_pair("uri", uri)
            .append_pair("lang", locale);
        url
    }
}

#[async_trait]
impl ContentClient for ContentServerClient {
    async fn get_resource_body(
        &self,
        access_token: Option<&str>,
        collection_id: Option<&str>,
        locale: &str,
        uri: &str,
    ) -> Result<Bytes, ContentError> {
        let url = self.resource_url(collection_id.filter(|id| !id.is_empty()), locale, uri);
        debug!(url = %url, "requesting resource from content server");

        let mut request = self.client.get(url);
        if let Some(token) = access_token.filter(|token| !token.is_empty()) {
            request = request.header(HEADER_ACCESS_TOKEN, token);
        }

        let transport = |source: reqwest::Error| ContentError::Transport {
            uri: uri.to_string(),
            source: Box::new(source),
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ContentError::UnexpectedStatus {
                status: status.as_u16(),
                uri: uri.to_string(),
            });
        }

        response.bytes().await.map_err(transport)
    }
}
