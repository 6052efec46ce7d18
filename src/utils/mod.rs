//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
///
/// Absolute hrefs and root-relative paths keep their characters exactly as
/// the page wrote them, so stored links match across runs even when they
/// contain unencoded Hangul. Other relative forms go through `Url::join`.
pub fn resolve_url(base: &Url, href: &str) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    if href.starts_with('/') && !href.starts_with("//") {
        return format!("{}{href}", base.origin().ascii_serialization());
    }
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
