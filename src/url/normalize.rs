use crate::UrlError;
use url::Url;

/// Canonicalizes a posting URL so it can serve as a stable identity
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed or not HTTP(S)
/// 2. Remove the fragment
/// 3. Remove `utm_*` campaign parameters
/// 4. Remove an empty query string
///
/// Every other query parameter is kept byte for byte, in order: the
/// canonical URL is also the URL the detail page is fetched from.
///
/// # Examples
///
/// ```
/// use jobscan::url::canonical_url;
///
/// let url = canonical_url("https://example.com/job/1?utm_source=x#apply").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/job/1");
/// ```
pub fn canonical_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if let Some(query) = url.query() {
        let kept: Vec<&str> = query
            .split('&')
            .filter(|segment| !segment.is_empty() && !is_campaign_param(segment))
            .collect();

        let kept = if kept.is_empty() {
            None
        } else {
            Some(kept.join("&"))
        };
        url.set_query(kept.as_deref());
    }

    Ok(url)
}

fn is_campaign_param(segment: &str) -> bool {
    let key = segment.split('=').next().unwrap_or(segment);
    key.starts_with("utm_")
}
