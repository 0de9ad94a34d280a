//! Canonical values for the table download scenario.

/// Resource requested by the canonical download.
pub const REQUEST_URI: &str = "/foo/bar.json";
/// Format requested by the canonical download.
pub const REQUEST_FORMAT: &str = "html";
/// Disposition expected for [`REQUEST_URI`] rendered as [`REQUEST_FORMAT`].
pub const EXPECTED_DISPOSITION: &str = "attachment; filename=\"bar.html\"";
/// Access token forwarded by the caller.
pub const ACCESS_TOKEN: &str = "myAccessToken";
/// Collection scoping the lookup.
pub const COLLECTION_ID: &str = "myCollection";
/// Body returned by the stub content service.
pub const CONTENT_RESPONSE: &str = "contentServerResponse";
/// Body returned by the stub renderer.
pub const RENDER_RESPONSE: &str = "renderServerResponse";
/// Content type returned by the stub renderer.
pub const RENDER_CONTENT_TYPE: &str = "text/html";
