//! Request accounting middleware.

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use filedl_telemetry::{Metrics, RequestContext};

use crate::http::constants::HEADER_REQUEST_ID;

/// Run the handler inside the request's context and count the response by route and status.
pub(crate) async fn record_request(
    State(telemetry): State<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let route = request.extensions().get::<MatchedPath>().map_or_else(
        || request.uri().path().to_owned(),
        |matched| matched.as_str().to_owned(),
    );
    let request_id = request
        .headers()
        .get(HEADER_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let response = RequestContext::new(&request_id, &route)
        .scope(next.run(request))
        .await;
    telemetry.inc_http_request(&route, response.status().as_u16());
    response
}
