//! # Design
//!
//! - Provide a single crate-level error type for server bind, serve and shutdown failures.
//! - Keep error messages constant; capture operational context in structured fields.
//! - Preserve sources for diagnostics without double-logging.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

/// Result alias for API server operations.
pub type ApiServerResult<T> = std::result::Result<T, ApiServerError>;

/// Errors raised while running the API server.
#[derive(Debug)]
pub enum ApiServerError {
    /// Binding the listener failed.
    Bind {
        /// Address attempted.
        addr: SocketAddr,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The server stopped with an IO error.
    Serve {
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The server task panicked or was cancelled.
    Task {
        /// Underlying join error.
        source: tokio::task::JoinError,
    },
    /// In-flight requests did not finish before the shutdown deadline.
    ShutdownTimeout {
        /// Deadline that elapsed.
        timeout: Duration,
    },
}

impl Display for ApiServerError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { .. } => formatter.write_str("failed to bind api listener"),
            Self::Serve { .. } => formatter.write_str("api server terminated unexpectedly"),
            Self::Task { .. } => formatter.write_str("api server task failed"),
            Self::ShutdownTimeout { .. } => {
                formatter.write_str("api server did not shut down before the deadline")
            }
        }
    }
}

impl Error for ApiServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bind { source, .. } | Self::Serve { source } => Some(source),
            Self::Task { source } => Some(source),
            Self::ShutdownTimeout { .. } => None,
        }
    }
}
