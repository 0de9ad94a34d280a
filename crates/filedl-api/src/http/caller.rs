//! Caller identity carried on inbound requests.
//!
//! Each value is read from a header first and a cookie second; empty values count as absent.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use filedl_table::{DownloadRequest, model::DEFAULT_LOCALE};

use crate::http::constants::{
    COOKIE_ACCESS_TOKEN, COOKIE_COLLECTION, COOKIE_LOCALE, HEADER_ACCESS_TOKEN,
    HEADER_COLLECTION_ID, HEADER_LOCALE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Caller {
    pub(crate) locale: String,
    pub(crate) collection_id: Option<String>,
    pub(crate) access_token: Option<String>,
}

impl Caller {
    pub(crate) fn from_headers(headers: &HeaderMap) -> Self {
        let lookup = |header: &str, cookie: &str| {
            header_value(headers, header).or_else(|| cookie_value(headers, cookie))
        };
        Self {
            locale: lookup(HEADER_LOCALE, COOKIE_LOCALE)
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            collection_id: lookup(HEADER_COLLECTION_ID, COOKIE_COLLECTION),
            access_token: lookup(HEADER_ACCESS_TOKEN, COOKIE_ACCESS_TOKEN),
        }
    }

    pub(crate) fn apply(self, mut request: DownloadRequest) -> DownloadRequest {
        request = request.with_locale(self.locale);
        if let Some(collection_id) = self.collection_id {
            request = request.with_collection(collection_id);
        }
        if let Some(token) = self.access_token {
            request = request.with_access_token(token);
        }
        request
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn defaults_when_nothing_is_sent() {
        let caller = Caller::from_headers(&HeaderMap::new());
        assert_eq!(caller.locale, "en");
        assert_eq!(caller.collection_id, None);
        assert_eq!(caller.access_token, None);
    }

    #[test]
    fn cookies_are_used_when_headers_are_absent() {
        let caller = Caller::from_headers(&headers(&[(
            "cookie",
            "lang=cy; collection=myCollection; access_token=myAccessToken",
        )]));
        assert_eq!(caller.locale, "cy");
        assert_eq!(caller.collection_id.as_deref(), Some("myCollection"));
        assert_eq!(caller.access_token.as_deref(), Some("myAccessToken"));
    }

    #[test]
    fn headers_win_over_cookies() {
        let caller = Caller::from_headers(&headers(&[
            ("localecode", "cy"),
            ("collection-id", "fromHeader"),
            ("x-florence-token", "headerToken"),
            ("cookie", "lang=en; collection=fromCookie; access_token=cookieToken"),
        ]));
        assert_eq!(caller.locale, "cy");
        assert_eq!(caller.collection_id.as_deref(), Some("fromHeader"));
        assert_eq!(caller.access_token.as_deref(), Some("headerToken"));
    }

    #[test]
    fn cookies_split_across_headers_and_empty_values_are_ignored() {
        let caller = Caller::from_headers(&headers(&[
            ("x-florence-token", ""),
            ("cookie", "collection="),
            ("cookie", "other=1; access_token=\"quoted\""),
        ]));
        assert_eq!(caller.collection_id, None);
        assert_eq!(caller.access_token.as_deref(), Some("quoted"));
    }

    #[test]
    fn apply_forwards_identity_onto_request() {
        let caller = Caller {
            locale: "cy".to_string(),
            collection_id: Some("c1".to_string()),
            access_token: Some("t1".to_string()),
        };
        let request = caller.apply(DownloadRequest::new("csv", "/a.json"));
        assert_eq!(request.locale, "cy");
        assert_eq!(request.collection_id.as_deref(), Some("c1"));
        assert_eq!(request.access_token.as_deref(), Some("t1"));
    }
}
