use std::sync::Arc;

use anyhow::{Result, anyhow};
use filedl_table::{
    ContentClient, DownloadError, DownloadErrorKind, DownloadRequest, Downloader, RenderClient,
    TableDownloader,
};
use filedl_test_support::fixtures::{
    ACCESS_TOKEN, COLLECTION_ID, CONTENT_RESPONSE, EXPECTED_DISPOSITION, RENDER_CONTENT_TYPE,
    RENDER_RESPONSE, REQUEST_FORMAT, REQUEST_URI,
};
use filedl_test_support::{StubContentClient, StubRenderClient};

fn downloader(
    content: &Arc<StubContentClient>,
    renderer: &Arc<StubRenderClient>,
) -> TableDownloader {
    let content: Arc<dyn ContentClient> = content.clone();
    let renderer: Arc<dyn RenderClient> = renderer.clone();
    TableDownloader::new(content, renderer)
}

fn canonical_request() -> DownloadRequest {
    DownloadRequest::new(REQUEST_FORMAT, REQUEST_URI).with_access_token(ACCESS_TOKEN)
}

#[tokio::test]
async fn successful_download_relays_renderer_response() -> Result<()> {
    let content = Arc::new(StubContentClient::canonical());
    let renderer = Arc::new(StubRenderClient::canonical());

    let download = downloader(&content, &renderer)
        .download(canonical_request())
        .await?;

    assert_eq!(download.status, 200);
    assert_eq!(download.content_type(), Some(RENDER_CONTENT_TYPE));
    assert_eq!(download.content_disposition(), Some(EXPECTED_DISPOSITION));
    let body = download.body.collect().await.map_err(|err| anyhow!(err))?;
    assert_eq!(body.as_ref(), RENDER_RESPONSE.as_bytes());

    let content_calls = content.calls();
    assert_eq!(content_calls.len(), 1);
    assert_eq!(content_calls[0].uri, REQUEST_URI);
    assert_eq!(content_calls[0].access_token.as_deref(), Some(ACCESS_TOKEN));
    assert_eq!(content_calls[0].locale, "en");

    let render_calls = renderer.calls();
    assert_eq!(render_calls.len(), 1);
    assert_eq!(render_calls[0].format, REQUEST_FORMAT);
    assert_eq!(render_calls[0].body.as_ref(), CONTENT_RESPONSE.as_bytes());
    Ok(())
}

#[tokio::test]
async fn collection_and_locale_are_forwarded() -> Result<()> {
    let content = Arc::new(StubContentClient::canonical());
    let renderer = Arc::new(StubRenderClient::canonical());

    let request = canonical_request()
        .with_collection(COLLECTION_ID)
        .with_locale("cy");
    let download = downloader(&content, &renderer).download(request).await?;
    assert_eq!(download.content_disposition(), Some(EXPECTED_DISPOSITION));

    let calls = content.calls();
    assert_eq!(calls[0].collection_id.as_deref(), Some(COLLECTION_ID));
    assert_eq!(calls[0].locale, "cy");
    Ok(())
}

#[tokio::test]
async fn renderer_status_and_content_type_pass_through() -> Result<()> {
    let content = Arc::new(StubContentClient::canonical());
    let renderer = Arc::new(StubRenderClient::responding(
        206,
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "xlsx-bytes",
    ));

    let download = downloader(&content, &renderer)
        .download(DownloadRequest::new("xlsx", "/economy/cpi/table.json"))
        .await?;

    assert_eq!(download.status, 206);
    assert_eq!(
        download.content_type(),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    );
    assert_eq!(
        download.content_disposition(),
        Some("attachment; filename=\"table.xlsx\"")
    );
    Ok(())
}

#[tokio::test]
async fn missing_parameters_never_reach_backends() {
    for (format, uri) in [("", ""), ("", REQUEST_URI), (REQUEST_FORMAT, "")] {
        let content = Arc::new(StubContentClient::canonical());
        let renderer = Arc::new(StubRenderClient::canonical());

        let err = downloader(&content, &renderer)
            .download(DownloadRequest::new(format, uri))
            .await
            .expect_err("empty parameters must be rejected");

        assert_eq!(err.status_code(), 400);
        assert!(matches!(err, DownloadError::MissingParameters { .. }));
        assert_eq!(content.call_count(), 0);
        assert_eq!(renderer.call_count(), 0);
    }
}

#[tokio::test]
async fn missing_content_returns_not_found_without_rendering() {
    let content = Arc::new(StubContentClient::failing_with_status(404));
    let renderer = Arc::new(StubRenderClient::canonical());

    let err = downloader(&content, &renderer)
        .download(DownloadRequest::new(REQUEST_FORMAT, "/foo/bar"))
        .await
        .expect_err("missing content must fail");

    assert_eq!(err.kind(), DownloadErrorKind::NotFound);
    assert_eq!(err.status_code(), 404);
    assert_eq!(content.call_count(), 1);
    assert_eq!(renderer.call_count(), 0);
}

#[tokio::test]
async fn content_server_failure_is_internal() {
    let content = Arc::new(StubContentClient::failing_with_status(500));
    let renderer = Arc::new(StubRenderClient::canonical());

    let err = downloader(&content, &renderer)
        .download(canonical_request())
        .await
        .expect_err("content server failure must surface");

    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().contains("status 500"));
    assert_eq!(renderer.call_count(), 0);
}

#[tokio::test]
async fn other_content_statuses_become_bad_requests() {
    for status in [401, 403, 409, 502] {
        let content = Arc::new(StubContentClient::failing_with_status(status));
        let renderer = Arc::new(StubRenderClient::canonical());

        let err = downloader(&content, &renderer)
            .download(canonical_request())
            .await
            .expect_err("content failure must surface");

        assert_eq!(err.status_code(), 400, "upstream {status}");
        assert!(err.to_string().contains(&format!("status {status}")));
        assert_eq!(renderer.call_count(), 0);
    }
}

#[tokio::test]
async fn unreachable_content_server_is_internal() {
    let content = Arc::new(StubContentClient::unreachable());
    let renderer = Arc::new(StubRenderClient::canonical());

    let err = downloader(&content, &renderer)
        .download(canonical_request())
        .await
        .expect_err("transport failure must surface");

    assert_eq!(err.status_code(), 500);
    assert_eq!(renderer.call_count(), 0);
}

#[tokio::test]
async fn renderer_transport_failure_is_internal() {
    let content = Arc::new(StubContentClient::canonical());
    let renderer = Arc::new(StubRenderClient::unreachable());

    let err = downloader(&content, &renderer)
        .download(canonical_request())
        .await
        .expect_err("render failure must surface");

    assert_eq!(err.status_code(), 500);
    assert!(matches!(err, DownloadError::Render { .. }));
    assert_eq!(content.call_count(), 1);
    assert_eq!(renderer.call_count(), 1);
}

#[test]
fn table_downloader_describes_its_route() {
    let content = Arc::new(StubContentClient::canonical());
    let renderer = Arc::new(StubRenderClient::canonical());
    let downloader = downloader(&content, &renderer);
    assert_eq!(downloader.kind(), "table");
    assert_eq!(downloader.query_parameters(), &["format", "uri"]);
}
