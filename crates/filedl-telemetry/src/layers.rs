//! `x-request-id` middleware for the HTTP stack.
//!
//! # Design
//! - The generator sits outside the propagator so a freshly minted id is copied onto
//!   the response as well as a caller-supplied one.

use tower::ServiceBuilder;
use tower::layer::util::{Identity, Stack};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Layer stack that assigns an `x-request-id` to requests arriving without one and
/// echoes the request's id on the response.
pub type RequestIdLayer =
    Stack<PropagateRequestIdLayer, Stack<SetRequestIdLayer<MakeRequestUuid>, Identity>>;

/// Build the request-id stack.
#[must_use]
pub fn request_id_layer() -> RequestIdLayer {
    ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use std::convert::Infallible;
    use tower::ServiceExt;

    const X_REQUEST_ID: &str = "x-request-id";

    async fn respond(request: Request<Body>) -> anyhow::Result<Response<Body>> {
        let service = ServiceBuilder::new()
            .layer(request_id_layer())
            .service_fn(|_request: Request<Body>| async {
                Ok::<_, Infallible>(Response::new(Body::empty()))
            });
        Ok(service.oneshot(request).await?)
    }

    #[tokio::test]
    async fn generated_id_is_returned_to_the_caller() -> anyhow::Result<()> {
        let response = respond(Request::new(Body::empty())).await?;
        let id = response
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(!id.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn caller_id_is_echoed_unchanged() -> anyhow::Result<()> {
        let request = Request::builder()
            .header(X_REQUEST_ID, "req-7")
            .body(Body::empty())?;
        let response = respond(request).await?;
        assert_eq!(
            response.headers().get(X_REQUEST_ID).map(|value| value.as_bytes()),
            Some(b"req-7".as_slice())
        );
        Ok(())
    }
}
