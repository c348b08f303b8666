//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve an `href` against the URL of the page it was found on.
///
/// The fragment is dropped, so `/p/1` and `/p/1#team` name the same page.
/// Returns `None` for a missing target: an empty or fragment-only `href`,
/// or one that cannot be joined onto `base`.
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let mut url = base.join(href).ok()?;
    url.set_fragment(None);
    Some(url.to_string())
}

/// Extract the host from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_ascii_lowercase()))
}

/// Collapse whitespace runs into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
