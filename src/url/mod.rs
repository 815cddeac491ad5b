//! URL handling module for Jobscan
//!
//! This module provides posting URL canonicalization, link resolution against
//! a page URL, and listing-page URL templates.

mod normalize;

pub use normalize::canonical_url;

use crate::UrlError;
use url::Url;

/// Placeholder replaced by the encoded page number in paged URL templates
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Renders a paged listing URL template
///
/// # Arguments
///
/// * `template` - URL template containing `{page}`
/// * `encoded_page` - The page number as it should appear in the URL
///
/// # Examples
///
/// ```
/// use jobscan::url::render_page_url;
///
/// let url = render_page_url("https://example.com/jobs?from={page}", 50).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/jobs?from=50");
/// ```
pub fn render_page_url(template: &str, encoded_page: u64) -> Result<Url, UrlError> {
    if !template.contains(PAGE_PLACEHOLDER) {
        return Err(UrlError::MissingPlaceholder(template.to_string()));
    }

    let rendered = template.replace(PAGE_PLACEHOLDER, &encoded_page.to_string());
    Url::parse(&rendered).map_err(|e| UrlError::Parse(e.to_string()))
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be ignored:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel:, data: schemes
/// - hrefs that do not resolve to an HTTP(S) URL
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url)
        }
        _ => None,
    }
}

/// Reads a numeric query parameter from a URL
pub fn page_param(url: &Url, name: &str) -> Option<u32> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .and_then(|(_, value)| value.trim().replace(' ', "").parse().ok())
}
