//! Shared handler state.

use std::collections::HashMap;
use std::sync::Arc;

use filedl_health::HealthCheck;
use filedl_table::Downloader;
use filedl_telemetry::Metrics;

pub(crate) struct ApiState {
    downloaders: HashMap<&'static str, Arc<dyn Downloader>>,
    pub(crate) health: HealthCheck,
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    pub(crate) fn new(
        downloaders: impl IntoIterator<Item = Arc<dyn Downloader>>,
        health: HealthCheck,
        telemetry: Metrics,
    ) -> Self {
        Self {
            downloaders: downloaders
                .into_iter()
                .map(|downloader| (downloader.kind(), downloader))
                .collect(),
            health,
            telemetry,
        }
    }

    pub(crate) fn downloader(&self, kind: &str) -> Option<Arc<dyn Downloader>> {
        self.downloaders.get(kind).cloned()
    }

    pub(crate) fn downloaders(&self) -> impl Iterator<Item = &Arc<dyn Downloader>> {
        self.downloaders.values()
    }
}
