//! Process and request scoped tracing context.
//!
//! # Design
//! - The service span stays entered for the whole process so every event carries the
//!   service name, version and build SHA.
//! - Request identifiers live in task-local storage; handlers read them without
//!   threading the values through every call.

use std::future::Future;
use std::sync::Arc;

use tracing::span::EnteredSpan;

use crate::init::build_sha;

/// Keeps the process-wide service span entered until dropped.
pub struct ServiceSpanGuard {
    _span: EnteredSpan,
}

impl ServiceSpanGuard {
    /// Enter a `service` span tagged with `service`, `version` and the build SHA.
    #[must_use]
    pub fn enter(service: &str, version: &str) -> Self {
        let span = tracing::info_span!(
            "service",
            service = %service,
            version = %version,
            build_sha = %build_sha()
        );
        Self {
            _span: span.entered(),
        }
    }
}

/// Identifiers of the request currently being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: Arc<str>,
    route: Arc<str>,
}

tokio::task_local! {
    static ACTIVE: RequestContext;
}

impl RequestContext {
    /// Context for a request with the given id on the given matched route.
    #[must_use]
    pub fn new(request_id: &str, route: &str) -> Self {
        Self {
            request_id: Arc::from(request_id),
            route: Arc::from(route),
        }
    }

    /// Request identifier, empty when the caller sent none and none was generated.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Matched route template.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Context of the enclosing [`RequestContext::scope`], if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        ACTIVE.try_with(Clone::clone).ok()
    }

    /// Run `fut` with this context visible to [`RequestContext::current`].
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        ACTIVE.scope(self, fut).await
    }
}

/// Request identifier of the request being served, if any.
#[must_use]
pub fn current_request_id() -> Option<String> {
    RequestContext::current().map(|ctx| ctx.request_id().to_string())
}
