//! # Design
//!
//! - Centralize bootstrap and lifecycle errors for the binary.
//! - Keep error messages constant while carrying the failing operation as context.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: filedl_config::ConfigError,
    },
    /// Telemetry could not be installed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: filedl_telemetry::TelemetryError,
    },
    /// A backend client could not be constructed.
    #[error("backend client operation failed")]
    Backend {
        /// Operation identifier.
        operation: &'static str,
        /// Source backend error.
        source: filedl_backends::BackendError,
    },
    /// The health check could not be assembled.
    #[error("health check operation failed")]
    Health {
        /// Operation identifier.
        operation: &'static str,
        /// Source health error.
        source: filedl_health::HealthError,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: filedl_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn config(operation: &'static str, source: filedl_config::ConfigError) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: filedl_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn backend(
        operation: &'static str,
        source: filedl_backends::BackendError,
    ) -> Self {
        Self::Backend { operation, source }
    }

    pub(crate) const fn health(operation: &'static str, source: filedl_health::HealthError) -> Self {
        Self::Health { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: filedl_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::time::Duration;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "config.load",
            filedl_config::ConfigError::InvalidValue {
                variable: "BIND_ADDR",
                value: "nope".to_string(),
                reason: "invalid_address",
            },
        );
        assert!(matches!(
            config,
            AppError::Config {
                operation: "config.load",
                ..
            }
        ));
        assert!(config.source().is_some());

        let backend = AppError::backend(
            "renderer.new",
            filedl_backends::BackendError::InvalidBaseUrl {
                url: "data:text/plain,x".to_string(),
            },
        );
        assert!(matches!(backend, AppError::Backend { .. }));

        let health = AppError::health("health.build", filedl_health::HealthError::ZeroInterval);
        assert!(matches!(health, AppError::Health { .. }));

        let api = AppError::api_server(
            "api_server.shutdown",
            filedl_api::ApiServerError::ShutdownTimeout {
                timeout: Duration::from_secs(5),
            },
        );
        assert_eq!(api.to_string(), "api server operation failed");
    }
}
