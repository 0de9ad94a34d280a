//! Upstream `/health` probes.

use std::time::Duration;

use async_trait::async_trait;
use filedl_health::{CheckOutcome, Checker};
use reqwest::Client;
use tracing::warn;
use url::Url;

use crate::base_url::BaseUrl;
use crate::error::BackendResult;

const HEALTH_PATH: &str = "health";
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Polls `{base}/health` and maps the answer onto a check outcome.
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    name: String,
    client: Client,
    url: Url,
}

impl HttpHealthProbe {
    /// Probe for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_url` cannot carry path segments.
    pub fn new(name: impl Into<String>, client: Client, base_url: Url) -> BackendResult<Self> {
        let url = BaseUrl::new(base_url)?.join([HEALTH_PATH]);
        Ok(Self {
            name: name.into(),
            client,
            url,
        })
    }

    /// Name reported in health output.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Checker for HttpHealthProbe {
    async fn check(&self) -> CheckOutcome {
        match self
            .client
            .get(self.url.clone())
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => CheckOutcome::from_response(&self.name, response.status().as_u16()),
            Err(err) => {
                warn!(check = %self.name, error = %err, "health probe failed");
                CheckOutcome::unreachable(&self.name)
            }
        }
    }
}
