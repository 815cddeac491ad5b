//! Page cursor movement and max-page discovery

use crate::config::SiteDescriptor;
use crate::crawler::fetcher::Fetcher;
use crate::extract::Extractor;
use crate::state::ScanCursor;
use crate::url::render_page_url;
use crate::{JobscanError, UrlError};
use url::Url;

/// URL of the listing page the cursor points at
///
/// The initial page is the site's base URL; later pages are rendered from
/// the paged template with the site's page encoding.
pub fn current_url(site: &SiteDescriptor, cursor: &ScanCursor) -> Result<Url, UrlError> {
    if cursor.page == site.initial_page {
        return Url::parse(&site.base_url).map_err(|e| UrlError::Parse(e.to_string()));
    }
    render_page_url(&site.paged_url, site.page_encoding.encode(cursor.page))
}

/// Moves the cursor to the next page
pub fn advance(cursor: &mut ScanCursor) {
    cursor.page = cursor.page.saturating_add(1);
}

/// Loop predicate: still continuing and not past a known max page
pub fn should_continue(cursor: &ScanCursor) -> bool {
    cursor.is_continuing() && (cursor.max_page == 0 || cursor.page <= cursor.max_page)
}

/// Reads a bounded site's last page number from its first listing page
pub async fn discover_max_page(
    fetcher: &Fetcher,
    extractor: &dyn Extractor,
    site: &SiteDescriptor,
) -> Result<u32, JobscanError> {
    let url = Url::parse(&site.base_url)?;
    let document = fetcher.fetch(&url).await?;
    let max_page = extractor.max_page(&document)?;
    Ok(max_page)
}
