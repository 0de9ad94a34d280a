//! Error types for health check registration.

use thiserror::Error;

/// Errors raised while assembling a health check.
#[derive(Debug, Error)]
pub enum HealthError {
    /// Two checks were registered under the same name.
    #[error("duplicate health check")]
    DuplicateCheck {
        /// Name that was registered twice.
        name: String,
    },
    /// The polling interval was zero.
    #[error("invalid health check interval")]
    ZeroInterval,
}

/// Convenience alias for health check results.
pub type HealthResult<T> = Result<T, HealthError>;
