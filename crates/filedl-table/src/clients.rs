//! Backend capabilities the orchestrator depends on.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{ContentError, RenderError};
use crate::model::RenderedTable;

/// Fetches JSON definitions from the content service.
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// Retrieve the body of the resource at `uri`, optionally scoped to a collection.
    async fn get_resource_body(
        &self,
        access_token: Option<&str>,
        collection_id: Option<&str>,
        locale: &str,
        uri: &str,
    ) -> Result<Bytes, ContentError>;
}

/// Converts a table definition into an output format.
#[async_trait]
pub trait RenderClient: Send + Sync {
    /// Post `body` to the renderer and return its response, whatever its status.
    async fn post_body(&self, format: &str, body: Bytes) -> Result<RenderedTable, RenderError>;
}
