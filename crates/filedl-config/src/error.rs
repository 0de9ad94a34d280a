//! Error types for configuration loading.

use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable held a value that could not be parsed.
    #[error("invalid configuration value")]
    InvalidValue {
        /// Environment variable name.
        variable: &'static str,
        /// Offending value.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// A variable held a malformed URL.
    #[error("invalid configuration url")]
    InvalidUrl {
        /// Environment variable name.
        variable: &'static str,
        /// Offending value.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

impl ConfigError {
    /// Name of the variable that failed to load.
    #[must_use]
    pub const fn variable(&self) -> &'static str {
        match self {
            Self::InvalidValue { variable, .. } | Self::InvalidUrl { variable, .. } => variable,
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
