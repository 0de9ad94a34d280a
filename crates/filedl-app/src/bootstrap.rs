//! Service wiring and process lifecycle.
//!
//! # Design
//! - Configuration and telemetry come first so every later step is logged.
//! - Backend clients share one HTTP client and its connection pool.
//! - Shutdown stops the health poller before draining the listener.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use filedl_api::{ApiServer, RunningServer};
use filedl_backends::{ContentServerClient, HttpHealthProbe, TableRendererClient, build_http_client};
use filedl_config::ServiceConfig;
use filedl_health::{HealthCheck, VersionInfo};
use filedl_table::{Downloader, TableDownloader};
use filedl_telemetry::{
    LogFormat, LoggingConfig, Metrics, OpenTelemetryConfig, ServiceSpanGuard,
    init_logging_with_otel,
};
use tracing::{error, info};

use crate::error::{AppError, AppResult};

const RENDERER_CHECK: &str = "frontend renderer";
const API_ROUTER_CHECK: &str = "API router";

/// Dependencies required to bootstrap the relay.
pub(crate) struct BootstrapDependencies {
    config: ServiceConfig,
    version: VersionInfo,
    telemetry: Metrics,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment.
    pub(crate) fn from_env() -> AppResult<Self> {
        let config =
            ServiceConfig::from_env().map_err(|err| AppError::config("config.from_env", err))?;
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        Ok(Self {
            config,
            version: version_info(),
            telemetry,
        })
    }
}

/// Running services owned by the process until shutdown.
pub(crate) struct Services {
    health: HealthCheck,
    server: RunningServer,
}

/// Entry point for the relay boot sequence.
///
/// # Errors
///
/// Returns an error if configuration, telemetry or listener setup fails, if the
/// server stops on its own, or if shutdown overruns its deadline.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    Box::pin(run_app_with(dependencies, shutdown_signal())).await
}

/// Boot sequence over injected dependencies and an injected shutdown trigger.
pub(crate) async fn run_app_with<F>(
    dependencies: BootstrapDependencies,
    shutdown: F,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send,
{
    let BootstrapDependencies {
        config,
        version,
        telemetry,
    } = dependencies;

    let logging = LoggingConfig {
        format: LogFormat::from_setting(config.log_format.as_deref()),
        build_sha: &version.git_commit,
        ..LoggingConfig::default()
    };
    let otel = OpenTelemetryConfig {
        enabled: config.otel.enabled,
        service_name: Cow::Borrowed(&config.otel.service_name),
        endpoint: Cow::Borrowed(&config.otel.endpoint),
        batch_timeout: config.otel.batch_timeout,
    };
    let _otel_guard = init_logging_with_otel(&logging, Some(&otel))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _span = ServiceSpanGuard::enter(&config.otel.service_name, &version.version);

    info!(
        version = %version.version,
        git_commit = %version.git_commit,
        build_time = %version.build_time,
        "dp-file-downloader starting"
    );
    config.log();

    let services = start_services(&config, version, telemetry).await?;
    wait_for_shutdown(services, &config, shutdown).await
}

/// Build the backend clients and health check, then bind the API server.
pub(crate) async fn start_services(
    config: &ServiceConfig,
    version: VersionInfo,
    telemetry: Metrics,
) -> AppResult<Services> {
    let http = build_http_client().map_err(|err| AppError::backend("http_client.build", err))?;

    let content = ContentServerClient::new(http.clone(), config.api_router_url.clone())
        .map_err(|err| AppError::backend("content_client.new", err))?;
    let renderer = TableRendererClient::new(http.clone(), config.table_renderer_host.clone())
        .map_err(|err| AppError::backend("renderer_client.new", err))?;

    let renderer_probe =
        HttpHealthProbe::new(RENDERER_CHECK, http.clone(), config.table_renderer_host.clone())
            .map_err(|err| AppError::backend("renderer_probe.new", err))?;
    let router_probe = HttpHealthProbe::new(API_ROUTER_CHECK, http, config.api_router_url.clone())
        .map_err(|err| AppError::backend("api_router_probe.new", err))?;

    let health = HealthCheck::builder(version)
        .interval(config.healthcheck_interval)
        .critical_timeout(config.healthcheck_critical_timeout)
        .check(RENDERER_CHECK, Arc::new(renderer_probe))
        .check(API_ROUTER_CHECK, Arc::new(router_probe))
        .build()
        .map_err(|err| AppError::health("health.build", err))?;
    health.start();

    let table: Arc<dyn Downloader> =
        Arc::new(TableDownloader::new(Arc::new(content), Arc::new(renderer)));
    let api = ApiServer::new(
        vec![table],
        health.clone(),
        telemetry,
        &config.cors_allowed_origins,
    );

    info!(addr = %config.bind_addr, "launching API listener");
    let server = match api.bind(config.bind_addr).await {
        Ok(server) => server,
        Err(err) => {
            health.stop();
            return Err(AppError::api_server("api_server.bind", err));
        }
    };
    info!(addr = %server.local_addr(), "API listener ready");

    Ok(Services { health, server })
}

/// Block until `shutdown` resolves or the server stops, then tear everything down.
pub(crate) async fn wait_for_shutdown<F>(
    services: Services,
    config: &ServiceConfig,
    shutdown: F,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send,
{
    let Services { health, mut server } = services;

    let stopped = tokio::select! {
        result = server.stopped() => Some(result),
        () = shutdown => None,
    };

    health.stop();
    if let Some(result) = stopped {
        error!("API server stopped unexpectedly");
        return result.map_err(|err| AppError::api_server("api_server.serve", err));
    }

    info!(timeout = ?config.shutdown_timeout, "shutting down gracefully");
    server
        .shutdown(config.shutdown_timeout)
        .await
        .map_err(|err| AppError::api_server("api_server.shutdown", err))?;
    info!("shutdown complete");
    Ok(())
}

/// Resolve on SIGINT, or on SIGTERM where the platform has it.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!(signal = "SIGINT", "shutdown signal received"),
        () = terminate => info!(signal = "SIGTERM", "shutdown signal received"),
    }
}

/// Build identification baked in at compile time.
pub(crate) fn version_info() -> VersionInfo {
    VersionInfo::new(
        option_env!("BUILD_TIME").unwrap_or("unknown"),
        option_env!("GIT_COMMIT").unwrap_or("unknown"),
        env!("CARGO_PKG_VERSION"),
        option_env!("RUSTC_VERSION").unwrap_or(env!("CARGO_PKG_RUST_VERSION")),
    )
}
