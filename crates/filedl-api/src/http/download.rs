//! `GET /download/{kind}`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use filedl_table::{
    DownloadError, DownloadErrorKind, DownloadRequest, FORMAT_PARAM, TableDownload, URI_PARAM,
};
use filedl_telemetry::{DownloadOutcome, current_request_id};
use futures_util::TryStreamExt;
use tracing::{error, info, warn};

use crate::http::caller::Caller;
use crate::state::ApiState;

pub(crate) async fn download(
    State(state): State<Arc<ApiState>>,
    Path(kind): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let Some(downloader) = state.downloader(&kind) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let param = |name: &str| params.get(name).cloned().unwrap_or_default();
    let request = Caller::from_headers(&headers)
        .apply(DownloadRequest::new(param(FORMAT_PARAM), param(URI_PARAM)));

    match downloader.download(request).await {
        Ok(download) => {
            state
                .telemetry
                .inc_download(downloader.kind(), DownloadOutcome::Success);
            info!(
                kind = downloader.kind(),
                status = download.status,
                content_disposition = download.content_disposition().unwrap_or_default(),
                "relaying download"
            );
            success_response(download)
        }
        Err(err) => {
            error!(
                error = %err,
                method = %method,
                path = uri.path(),
                query = uri.query().unwrap_or_default(),
                request_id = current_request_id().unwrap_or_default(),
                "download failed"
            );
            state
                .telemetry
                .inc_download(downloader.kind(), outcome_for(&err));
            if let Some(service) = err.upstream() {
                state.telemetry.inc_upstream_failure(service);
            }
            error_response(&err)
        }
    }
}

const fn outcome_for(err: &DownloadError) -> DownloadOutcome {
    match err.kind() {
        DownloadErrorKind::BadRequest => DownloadOutcome::BadRequest,
        DownloadErrorKind::NotFound => DownloadOutcome::NotFound,
        DownloadErrorKind::Internal => DownloadOutcome::Error,
    }
}

fn success_response(download: TableDownload) -> Response {
    let status = StatusCode::from_u16(download.status).unwrap_or_else(|_| {
        warn!(status = download.status, "renderer returned an invalid status");
        StatusCode::BAD_GATEWAY
    });

    let body = download.body.inspect_err(|err| {
        error!(error = %err, "failed to stream rendered table to caller");
    });
    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = status;

    let response_headers = response.headers_mut();
    for (name, value) in download.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                response_headers.insert(name, value);
            }
            _ => warn!(header = name, "dropping response header with invalid value"),
        }
    }
    response
}

fn error_response(err: &DownloadError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match err.kind() {
        DownloadErrorKind::NotFound => status.into_response(),
        DownloadErrorKind::BadRequest | DownloadErrorKind::Internal => {
            (status, err.to_string()).into_response()
        }
    }
}
