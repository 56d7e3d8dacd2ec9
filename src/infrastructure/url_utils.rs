//! URL helpers for query and record links

use url::Url;

use crate::domain::QueryError;

/// Placeholder replaced by the page number in a `PageUrlTemplate`
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Join two URL parts with exactly one `/` between them.
///
/// An empty side returns the other side unchanged.
pub fn join_uri(left: &str, right: &str) -> String {
    if left.is_empty() {
        return right.to_string();
    }
    if right.is_empty() {
        return left.to_string();
    }
    format!("{}/{}", left.trim_end_matches('/'), right.trim_start_matches('/'))
}

pub fn is_absolute_http(link: &str) -> bool {
    Url::parse(link).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// Absolute URL of a record link found on a listing page.
pub fn resolve_record_link(base_url: &str, link: &str) -> String {
    if is_absolute_http(link) {
        link.to_string()
    } else {
        join_uri(base_url, link)
    }
}

/// Check that a configured base URL is an absolute http(s) URL.
pub fn validate_base_url(base_url: &str) -> Result<(), QueryError> {
    let parsed = Url::parse(base_url).map_err(|e| QueryError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        scheme => Err(QueryError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme or missing host ({scheme})"),
        }),
    }
}

/// Suffix appended to a listing query URL to address page N
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrlTemplate {
    suffix: String,
}

impl PageUrlTemplate {
    /// `suffix` must contain `{page}`, e.g. `"/oldal-{page}"` or `"?page={page}"`.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }

    pub fn url_for(&self, query_url: &str, page: u32) -> String {
        let suffix = self.suffix.replace(PAGE_PLACEHOLDER, &page.to_string());
        if suffix.starts_with('/') {
            format!("{}{}", query_url.trim_end_matches('/'), suffix)
        } else {
            format!("{query_url}{suffix}")
        }
    }
}
