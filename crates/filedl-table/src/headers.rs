//! Response metadata derived from the requested resource.

/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "Content-Type";
/// `Content-Disposition` header name.
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";

const JSON_SUFFIX: &str = ".json";

/// Filename offered to the caller: the last path segment of `uri` without its `.json`
/// suffix, followed by `.` and the requested format.
#[must_use]
pub fn table_filename(uri: &str, format: &str) -> String {
    let last = uri.rsplit('/').next().unwrap_or(uri);
    let stem = last.strip_suffix(JSON_SUFFIX).unwrap_or(last);
    format!("{stem}.{format}")
}

/// `Content-Disposition` value marking the response as an attachment.
#[must_use]
pub fn content_disposition(uri: &str, format: &str) -> String {
    format!("attachment; filename=\"{}\"", table_filename(uri, format))
}

/// Header list for a rendered table: the renderer's content type (when present) and
/// the synthesised disposition.
pub(crate) fn download_headers(
    content_type: Option<String>,
    uri: &str,
    format: &str,
) -> Vec<(&'static str, String)> {
    let mut headers = Vec::with_capacity(2);
    if let Some(content_type) = content_type {
        headers.push((CONTENT_TYPE, content_type));
    }
    headers.push((CONTENT_DISPOSITION, content_disposition(uri, format)));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_uses_last_segment_without_json_suffix() {
        assert_eq!(table_filename("/foo/bar.json", "html"), "bar.html");
        assert_eq!(table_filename("/foo/bar", "csv"), "bar.csv");
        assert_eq!(table_filename("bar.json", "xlsx"), "bar.xlsx");
        assert_eq!(table_filename("/a/b/c/data.json.json", "csv"), "data.json.csv");
        assert_eq!(table_filename("/foo/", "html"), ".html");
    }

    #[test]
    fn disposition_quotes_filename() {
        assert_eq!(
            content_disposition("/foo/bar.json", "html"),
            "attachment; filename=\"bar.html\""
        );
    }

    #[test]
    fn headers_skip_missing_content_type() {
        let headers = download_headers(None, "/x/y.json", "csv");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].0, CONTENT_DISPOSITION);

        let headers = download_headers(Some("text/csv".into()), "/x/y.json", "csv");
        assert_eq!(headers[0], (CONTENT_TYPE, "text/csv".to_string()));
    }
}
