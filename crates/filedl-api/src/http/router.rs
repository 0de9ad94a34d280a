//! Router assembly and server lifecycle.
//!
//! # Design
//! - One route per registered downloader kind, plus `/health` and `/metrics`.
//! - Request id, tracing and metrics middleware wrap matched routes; CORS wraps everything.
//! - `bind` hands back a `RunningServer`; the caller owns shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{
        HeaderName, HeaderValue, Method, Request,
        header::{ACCEPT, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
    },
    routing::get,
};
use filedl_health::HealthCheck;
use filedl_table::Downloader;
use filedl_telemetry::{Metrics, build_sha};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Span, info, warn};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::{
    HEADER_REQUEST_ID, HEADER_REQUESTED_WITH, ROUTE_DOWNLOAD, ROUTE_HEALTH, ROUTE_METRICS,
};
use crate::http::download::download;
use crate::http::health::{health, metrics};
use crate::http::telemetry::record_request;
use crate::state::ApiState;

/// Configured HTTP application, ready to bind.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Assemble the router over the given downloaders.
    ///
    /// `allowed_origins` containing `*` (or nothing) allows any origin.
    #[must_use]
    pub fn new(
        downloaders: Vec<Arc<dyn Downloader>>,
        health_check: HealthCheck,
        telemetry: Metrics,
        allowed_origins: &[String],
    ) -> Self {
        let state = Arc::new(ApiState::new(downloaders, health_check, telemetry.clone()));
        for downloader in state.downloaders() {
            info!(
                kind = downloader.kind(),
                query_parameters = ?downloader.query_parameters(),
                "registered downloader"
            );
        }

        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let route = request
                    .extensions()
                    .get::<axum::extract::MatchedPath>()
                    .map_or_else(|| request.uri().path(), |matched| matched.as_str())
                    .to_string();
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %route,
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(filedl_telemetry::request_id_layer())
            .layer(trace_layer)
            .layer(axum::middleware::from_fn_with_state(telemetry, record_request));

        let router = Router::new()
            .route(ROUTE_DOWNLOAD, get(download))
            .route(ROUTE_HEALTH, get(health))
            .route(ROUTE_METRICS, get(metrics))
            .route_layer(layered)
            .layer(cors_layer(allowed_origins))
            .with_state(state);

        Self { router }
    }

    /// Bind `addr` and start serving in a background task.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn bind(self, addr: SocketAddr) -> ApiServerResult<RunningServer> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        info!(addr = %local_addr, "starting HTTP server");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let serve = axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
        let task = tokio::spawn(async move { serve.await });

        Ok(RunningServer {
            local_addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }

    #[cfg(test)]
    pub(crate) fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Handle to a server accepting connections.
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// Address the listener is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Resolve when the server stops without being asked to.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the server.
    pub async fn stopped(&mut self) -> ApiServerResult<()> {
        flatten(&mut self.task).await
    }

    /// Stop accepting connections and wait up to `timeout` for in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the deadline passes or the server failed while draining.
    pub async fn shutdown(mut self, timeout: Duration) -> ApiServerResult<()> {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Ok(result) = tokio::time::timeout(timeout, flatten(&mut self.task)).await {
            info!("HTTP server stopped");
            result
        } else {
            warn!(timeout = ?timeout, "HTTP server did not drain before the deadline");
            self.task.abort();
            Err(ApiServerError::ShutdownTimeout { timeout })
        }
    }
}

async fn flatten(task: &mut JoinHandle<std::io::Result<()>>) -> ApiServerResult<()> {
    match task.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(ApiServerError::Serve { source }),
        Err(source) => Err(ApiServerError::Task { source }),
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderName::from_static(HEADER_REQUESTED_WITH),
        ]);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
