//! Base URL handling shared by the backend clients.

use url::Url;

use crate::error::{BackendError, BackendResult};

/// Base URL that is known to accept extra path segments.
#[derive(Debug, Clone)]
pub(crate) struct BaseUrl(Url);

impl BaseUrl {
    pub(crate) fn new(url: Url) -> BackendResult<Self> {
        if url.cannot_be_a_base() {
            return Err(BackendError::InvalidBaseUrl {
                url: url.to_string(),
            });
        }
        Ok(Self(url))
    }

    /// Append encoded path segments, keeping any path already on the base
    /// (`http://router/v1` + `resource` → `http://router/v1/resource`).
    pub(crate) fn join<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.0.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) const fn as_url(&self) -> &Url {
        &self.0
    }
}
