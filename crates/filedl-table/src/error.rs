//! Error types for table downloads.
//!
//! # Design
//!
//! - Backend failures keep the upstream status (when one exists) so the orchestrator can
//!   classify them without string matching.
//! - `DownloadError` carries its own HTTP classification; the router only translates it.

use std::error::Error;

use thiserror::Error;

/// Boxed error used for opaque transport and stream failures.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Failure reported by a content client.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The content service answered with a non-success status.
    #[error("invalid response from content server - status {status}")]
    UnexpectedStatus {
        /// Status returned by the content service.
        status: u16,
        /// Resource that was requested.
        uri: String,
    },
    /// The request never produced a response.
    #[error("content server request failed")]
    Transport {
        /// Resource that was requested.
        uri: String,
        /// Underlying transport failure.
        #[source]
        source: BoxError,
    },
}

impl ContentError {
    /// Upstream HTTP status, when the failure carried one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }
}

/// Failure reported by a render client.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The render request could not be built.
    #[error("invalid table renderer request")]
    InvalidRequest {
        /// Requested output format.
        format: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The renderer was unreachable or failed before returning a response.
    #[error("table renderer request failed")]
    Transport {
        /// Requested output format.
        format: String,
        /// Underlying transport failure.
        #[source]
        source: BoxError,
    },
}

/// HTTP classification of a failed download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadErrorKind {
    /// Caller error or an unclassified content-service failure (400).
    BadRequest,
    /// Content resource does not exist upstream (404).
    NotFound,
    /// Upstream server failure or renderer transport failure (500).
    Internal,
}

impl DownloadErrorKind {
    /// HTTP status code for this classification.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }
}

/// Failure surfaced by a downloader.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Required query parameters were empty.
    #[error("bad request: format and uri query parameters are required")]
    MissingParameters {
        /// Whether `format` was empty.
        format: bool,
        /// Whether `uri` was empty.
        uri: bool,
    },
    /// The content service reported the resource as missing.
    #[error("content not found: {source}")]
    ContentNotFound {
        /// Resource that was requested.
        uri: String,
        /// Underlying content error.
        source: ContentError,
    },
    /// The content service failed internally or could not be reached.
    #[error("content server error: {source}")]
    ContentUnavailable {
        /// Resource that was requested.
        uri: String,
        /// Underlying content error.
        source: ContentError,
    },
    /// The content service rejected the request with some other status.
    #[error("content server rejected the request: {source}")]
    ContentRejected {
        /// Resource that was requested.
        uri: String,
        /// Underlying content error.
        source: ContentError,
    },
    /// The renderer could not produce a response.
    #[error("table renderer error: {source}")]
    Render {
        /// Requested output format.
        format: String,
        /// Underlying render error.
        source: RenderError,
    },
}

impl DownloadError {
    /// Classify a content-client failure for the resource at `uri`.
    ///
    /// Upstream 404 and 500 keep their meaning, any other upstream status collapses to a
    /// bad request, and failures without a status are treated as internal.
    #[must_use]
    pub fn from_content(uri: impl Into<String>, source: ContentError) -> Self {
        let uri = uri.into();
        match source.status() {
            Some(404) => Self::ContentNotFound { uri, source },
            Some(500) | None => Self::ContentUnavailable { uri, source },
            Some(_) => Self::ContentRejected { uri, source },
        }
    }

    /// HTTP classification of this failure.
    #[must_use]
    pub const fn kind(&self) -> DownloadErrorKind {
        match self {
            Self::MissingParameters { .. } | Self::ContentRejected { .. } => {
                DownloadErrorKind::BadRequest
            }
            Self::ContentNotFound { .. } => DownloadErrorKind::NotFound,
            Self::ContentUnavailable { .. } | Self::Render { .. } => DownloadErrorKind::Internal,
        }
    }

    /// HTTP status code for this failure.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Backend responsible for the failure, if any.
    #[must_use]
    pub const fn upstream(&self) -> Option<&'static str> {
        match self {
            Self::MissingParameters { .. } => None,
            Self::ContentNotFound { .. }
            | Self::ContentUnavailable { .. }
            | Self::ContentRejected { .. } => Some("content"),
            Self::Render { .. } => Some("renderer"),
        }
    }
}

/// Convenience alias for download results.
pub type DownloadResult<T> = Result<T, DownloadError>;
