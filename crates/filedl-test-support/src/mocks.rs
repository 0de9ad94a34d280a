//! Recording stand-ins for the content and render clients.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{StreamExt, stream};
use filedl_table::{
    ContentClient, ContentError, RenderBody, RenderClient, RenderError, RenderedTable,
};

use crate::fixtures::{CONTENT_RESPONSE, RENDER_CONTENT_TYPE, RENDER_RESPONSE};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Arguments received by [`StubContentClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentCall {
    /// Forwarded access token.
    pub access_token: Option<String>,
    /// Forwarded collection id.
    pub collection_id: Option<String>,
    /// Forwarded locale.
    pub locale: String,
    /// Requested resource.
    pub uri: String,
}

#[derive(Debug, Clone)]
enum ContentReply {
    Body(Bytes),
    Status(u16),
    Unreachable,
}

/// Content client returning a fixed reply and recording every call.
#[derive(Debug)]
pub struct StubContentClient {
    reply: ContentReply,
    calls: Mutex<Vec<ContentCall>>,
}

impl StubContentClient {
    fn with_reply(reply: ContentReply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `body`.
    #[must_use]
    pub fn returning(body: impl Into<Bytes>) -> Self {
        Self::with_reply(ContentReply::Body(body.into()))
    }

    /// Reply with the canonical content payload.
    #[must_use]
    pub fn canonical() -> Self {
        Self::returning(CONTENT_RESPONSE)
    }

    /// Fail as if the content service answered with `status`.
    #[must_use]
    pub fn failing_with_status(status: u16) -> Self {
        Self::with_reply(ContentReply::Status(status))
    }

    /// Fail as if the content service could not be reached.
    #[must_use]
    pub fn unreachable() -> Self {
        Self::with_reply(ContentReply::Unreachable)
    }

    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ContentCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl ContentClient for StubContentClient {
    async fn get_resource_body(
        &self,
        access_token: Option<&str>,
        collection_id: Option<&str>,
        locale: &str,
        uri: &str,
    ) -> Result<Bytes, ContentError> {
        lock(&self.calls).push(ContentCall {
            access_token: access_token.map(str::to_string),
            collection_id: collection_id.map(str::to_string),
            locale: locale.to_string(),
            uri: uri.to_string(),
        });
        match &self.reply {
            ContentReply::Body(body) => Ok(body.clone()),
            ContentReply::Status(status) => Err(ContentError::UnexpectedStatus {
                status: *status,
                uri: uri.to_string(),
            }),
            ContentReply::Unreachable => Err(ContentError::Transport {
                uri: uri.to_string(),
                source: Box::new(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "content server unreachable",
                )),
            }),
        }
    }
}

/// Arguments received by [`StubRenderClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCall {
    /// Requested output format.
    pub format: String,
    /// Payload posted to the renderer.
    pub body: Bytes,
}

#[derive(Debug, Clone)]
enum RenderReply {
    Response {
        status: u16,
        content_type: Option<String>,
        body: Bytes,
    },
    BrokenStream {
        status: u16,
        content_type: Option<String>,
        first_chunk: Bytes,
    },
    Unreachable,
}

/// Sets its flag when dropped; travels inside a body stream.
#[derive(Debug)]
struct ReleaseFlag(Arc<AtomicBool>);

impl Drop for ReleaseFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Render client returning a fixed reply and recording every call.
#[derive(Debug)]
pub struct StubRenderClient {
    reply: RenderReply,
    calls: Mutex<Vec<RenderCall>>,
    released: Arc<AtomicBool>,
}

impl StubRenderClient {
    /// Reply with the given status, content type and body.
    #[must_use]
    pub fn responding(status: u16, content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self::with_reply(RenderReply::Response {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        })
    }

    /// Answer 200 with the canonical content type, then fail the body after `first_chunk`.
    #[must_use]
    pub fn failing_mid_stream(first_chunk: impl Into<Bytes>) -> Self {
        Self::with_reply(RenderReply::BrokenStream {
            status: 200,
            content_type: Some(RENDER_CONTENT_TYPE.to_string()),
            first_chunk: first_chunk.into(),
        })
    }

    fn with_reply(reply: RenderReply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reply with the canonical rendered HTML.
    #[must_use]
    pub fn canonical() -> Self {
        Self::responding(200, Some(RENDER_CONTENT_TYPE), RENDER_RESPONSE)
    }

    /// Fail as if the renderer could not be reached.
    #[must_use]
    pub fn unreachable() -> Self {
        Self::with_reply(RenderReply::Unreachable)
    }

    /// Whether the most recently returned body has been dropped.
    #[must_use]
    pub fn body_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    fn tracked_body(&self, chunks: Vec<Result<Bytes, io::Error>>) -> RenderBody {
        self.released.store(false, Ordering::SeqCst);
        let flag = ReleaseFlag(Arc::clone(&self.released));
        RenderBody::from_stream(stream::iter(chunks).map(move |chunk| {
            let _held = &flag;
            chunk
        }))
    }

    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RenderCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl RenderClient for StubRenderClient {
    async fn post_body(&self, format: &str, body: Bytes) -> Result<RenderedTable, RenderError> {
        lock(&self.calls).push(RenderCall {
            format: format.to_string(),
            body,
        });
        match &self.reply {
            RenderReply::Response {
                status,
                content_type,
                body,
            } => Ok(RenderedTable {
                status: *status,
                content_type: content_type.clone(),
                body: self.tracked_body(vec![Ok(body.clone())]),
            }),
            RenderReply::BrokenStream {
                status,
                content_type,
                first_chunk,
            } => Ok(RenderedTable {
                status: *status,
                content_type: content_type.clone(),
                body: self.tracked_body(vec![
                    Ok(first_chunk.clone()),
                    Err(io::Error::new(
                        io::ErrorKind::ConnectionReset,
                        "renderer connection reset",
                    )),
                ]),
            }),
            RenderReply::Unreachable => Err(RenderError::Transport {
                format: format.to_string(),
                source: Box::new(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "renderer unreachable",
                )),
            }),
        }
    }
}
