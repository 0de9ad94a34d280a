//! Shared HTTP constants (headers, cookies, routes).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const HEADER_LOCALE: &str = "LocaleCode";
pub(crate) const HEADER_COLLECTION_ID: &str = "Collection-Id";
pub(crate) const HEADER_ACCESS_TOKEN: &str = "X-Florence-Token";
pub(crate) const HEADER_REQUESTED_WITH: &str = "x-requested-with";

pub(crate) const COOKIE_LOCALE: &str = "lang";
pub(crate) const COOKIE_COLLECTION: &str = "collection";
pub(crate) const COOKIE_ACCESS_TOKEN: &str = "access_token";

pub(crate) const ROUTE_DOWNLOAD: &str = "/download/{kind}";
pub(crate) const ROUTE_HEALTH: &str = "/health";
pub(crate) const ROUTE_METRICS: &str = "/metrics";

pub(crate) const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";
