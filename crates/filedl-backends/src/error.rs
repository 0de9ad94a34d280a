//! Error types for backend client construction.

use thiserror::Error;

/// Errors raised while constructing backend clients.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The HTTP client could not be built.
    #[error("failed to build http client")]
    ClientBuild {
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// A configured base URL cannot carry path segments.
    #[error("invalid backend base url")]
    InvalidBaseUrl {
        /// Offending URL.
        url: String,
    },
}

/// Convenience alias for backend construction results.
pub type BackendResult<T> = Result<T, BackendError>;
