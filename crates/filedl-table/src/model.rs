//! Request-scoped values flowing through a table download.
//!
//! # Design
//! - Nothing here outlives one request/response cycle.
//! - `RenderBody` owns the renderer connection; dropping it releases the connection,
//!   so whoever holds the value last is responsible for it.

use std::fmt::{self, Debug, Formatter};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use futures_util::{StreamExt, stream};

use crate::error::BoxError;
use crate::headers::{CONTENT_DISPOSITION, CONTENT_TYPE};

/// Locale used when the caller did not indicate one.
pub const DEFAULT_LOCALE: &str = "en";

/// Inputs to a single table download.
#[derive(Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Requested output format (`html`, `xlsx`, `csv`, ...).
    pub format: String,
    /// Content-service path of the JSON table definition.
    pub uri: String,
    /// Locale forwarded to the content service.
    pub locale: String,
    /// Unpublished collection scoping the content lookup.
    pub collection_id: Option<String>,
    /// Opaque credential forwarded to the content service.
    pub access_token: Option<String>,
}

impl DownloadRequest {
    /// Build a request for `uri` in `format` with the default locale and no collection scope.
    #[must_use]
    pub fn new(format: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            uri: uri.into(),
            locale: DEFAULT_LOCALE.to_string(),
            collection_id: None,
            access_token: None,
        }
    }

    /// Set the locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Scope the lookup to a collection.
    #[must_use]
    pub fn with_collection(mut self, collection_id: impl Into<String>) -> Self {
        self.collection_id = Some(collection_id.into());
        self
    }

    /// Attach the caller's access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

impl Debug for DownloadRequest {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DownloadRequest")
            .field("format", &self.format)
            .field("uri", &self.uri)
            .field("locale", &self.locale)
            .field("collection_id", &self.collection_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, BoxError>> + Send>>;

/// Owned body stream produced by the renderer.
///
/// The underlying connection is released when the value is dropped, whether or not
/// the stream was read to the end.
pub struct RenderBody {
    inner: ByteStream,
}

impl RenderBody {
    /// Wrap an arbitrary byte stream.
    pub fn from_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self {
            inner: Box::pin(stream.map(|chunk| chunk.map_err(Into::<BoxError>::into))),
        }
    }

    /// Body holding a single in-memory chunk.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let chunk: Result<Bytes, BoxError> = Ok(bytes.into());
        Self {
            inner: Box::pin(stream::iter([chunk])),
        }
    }

    /// Body with no content.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            inner: Box::pin(stream::empty::<Result<Bytes, BoxError>>()),
        }
    }

    /// Drain the stream into memory.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the underlying stream.
    pub async fn collect(mut self) -> Result<Bytes, BoxError> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = self.inner.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer.freeze())
    }
}

impl Stream for RenderBody {
    type Item = Result<Bytes, BoxError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl Debug for RenderBody {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("RenderBody { .. }")
    }
}

/// Response returned by the renderer.
#[derive(Debug)]
pub struct RenderedTable {
    /// HTTP status reported by the renderer.
    pub status: u16,
    /// `Content-Type` reported by the renderer, if any.
    pub content_type: Option<String>,
    /// Rendered bytes.
    pub body: RenderBody,
}

/// Envelope handed back to the router after a successful download.
#[derive(Debug)]
pub struct TableDownload {
    /// Status to relay to the caller.
    pub status: u16,
    /// Response headers, in insertion order.
    pub headers: Vec<(&'static str, String)>,
    /// Body stream; the holder must drop it once the response is written.
    pub body: RenderBody,
}

impl TableDownload {
    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// `Content-Type` relayed from the renderer.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    /// Synthesised `Content-Disposition`.
    #[must_use]
    pub fn content_disposition(&self) -> Option<&str> {
        self.header(CONTENT_DISPOSITION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn debug_output_redacts_access_token() {
        let request = DownloadRequest::new("csv", "/a/b.json").with_access_token("secret-token");
        let rendered = format!("{request:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("secret-token"));
    }

    #[test]
    fn builder_defaults_locale_and_scope() {
        let request = DownloadRequest::new("html", "/foo/bar.json");
        assert_eq!(request.locale, DEFAULT_LOCALE);
        assert!(request.collection_id.is_none());
        assert!(request.access_token.is_none());

        let scoped = request.with_collection("c-1").with_locale("cy");
        assert_eq!(scoped.collection_id.as_deref(), Some("c-1"));
        assert_eq!(scoped.locale, "cy");
    }

    #[tokio::test]
    async fn collect_concatenates_chunks() -> Result<(), BoxError> {
        let chunks: Vec<Result<Bytes, io::Error>> =
            vec![Ok(Bytes::from_static(b"render")), Ok(Bytes::from_static(b"ed"))];
        let body = RenderBody::from_stream(stream::iter(chunks));
        assert_eq!(body.collect().await?, Bytes::from_static(b"rendered"));
        assert!(RenderBody::empty().collect().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn collect_surfaces_stream_errors() {
        let chunks: Vec<Result<Bytes, io::Error>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ];
        let body = RenderBody::from_stream(stream::iter(chunks));
        assert!(body.collect().await.is_err());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let download = TableDownload {
            status: 200,
            headers: vec![(CONTENT_TYPE, "text/csv".to_string())],
            body: RenderBody::empty(),
        };
        assert_eq!(download.header("content-type"), Some("text/csv"));
        assert_eq!(download.content_type(), Some("text/csv"));
        assert!(download.content_disposition().is_none());
    }
}
