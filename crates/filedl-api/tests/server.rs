use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use filedl_api::{ApiServer, ApiServerError};
use filedl_health::{HealthCheck, VersionInfo};
use filedl_table::{Downloader, TableDownloader};
use filedl_telemetry::Metrics;
use filedl_test_support::fixtures::{EXPECTED_DISPOSITION, RENDER_RESPONSE};
use filedl_test_support::{StubContentClient, StubRenderClient};

fn server() -> anyhow::Result<ApiServer> {
    let downloader: Arc<dyn Downloader> = Arc::new(TableDownloader::new(
        Arc::new(StubContentClient::canonical()),
        Arc::new(StubRenderClient::canonical()),
    ));
    let health = HealthCheck::builder(VersionInfo::new("0", "test", "0.1.0", "1.85")).build()?;
    Ok(ApiServer::new(
        vec![downloader],
        health,
        Metrics::new()?,
        &["*".to_string()],
    ))
}

#[tokio::test]
async fn serves_downloads_until_shut_down() -> anyhow::Result<()> {
    let running = server()?
        .bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
        .await?;
    let base = format!("http://{}", running.local_addr());

    let response = reqwest::get(format!(
        "{base}/download/table?format=html&uri=/foo/bar.json"
    ))
    .await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-disposition")
            .and_then(|value| value.to_str().ok()),
        Some(EXPECTED_DISPOSITION)
    );
    assert_eq!(response.text().await?, RENDER_RESPONSE);

    let health = reqwest::get(format!("{base}/health")).await?;
    assert_eq!(health.status(), reqwest::StatusCode::OK);

    running.shutdown(Duration::from_secs(5)).await?;

    assert!(reqwest::get(format!("{base}/health")).await.is_err());
    Ok(())
}

#[tokio::test]
async fn binding_a_taken_port_fails() -> anyhow::Result<()> {
    let first = server()?
        .bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
        .await?;
    let taken = first.local_addr();

    let err = server()?.bind(taken).await.err();
    assert!(matches!(err, Some(ApiServerError::Bind { addr, .. }) if addr == taken));

    first.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}
