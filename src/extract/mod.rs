//! Job posting extraction
//!
//! Extraction happens in two phases per posting:
//!
//! 1. A listing page yields one `ListingSummary` per job card (URL, image, title)
//! 2. The posting's detail page yields the remaining `DetailFields`
//!
//! Sites differ only in their `Extractor` strategy. The site-independent
//! parts (deadline parsing, attribute and tag normalization) are applied by
//! `build_record` so every strategy produces records with the same shape.

mod deadline;
mod html;
mod normalize;
mod selector;

pub use deadline::parse_deadline;
pub use normalize::{
    canonical_label, normalize_attributes, normalize_sector, normalize_tags, SECTOR,
    SECTOR_NOT_SPECIFIED, SECTOR_PRIVATE, SECTOR_PUBLIC,
};
pub use selector::SelectorExtractor;

use crate::crawler::Document;
use crate::record::CandidateRecord;
use thiserror::Error;
use url::Url;

/// Errors raised while extracting a single card or page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Missing required field '{field}' on {url}")]
    MissingField { field: &'static str, url: String },

    #[error("Invalid URL '{value}' on {url}")]
    InvalidUrl { value: String, url: String },

    #[error("Invalid CSS selector: {0}")]
    Selector(String),

    #[error("Could not determine max page from {url}: {reason}")]
    MaxPage { url: String, reason: String },
}

/// Fields read from one job card on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSummary {
    /// Canonical posting URL, also the detail page URL
    pub url: Url,
    pub image_url: String,
    pub title: String,
}

/// Raw fields read from a posting's detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub company_name: Option<String>,
    pub company_image_url: Option<String>,
    pub description: Option<String>,

    /// Deadline as printed on the page
    pub deadline_text: Option<String>,

    /// Tag strings, possibly comma separated lists
    pub tags: Vec<String>,

    /// Label/value pairs with the site's own labels
    pub raw_attributes: Vec<(String, String)>,
}

/// Per-site extraction strategy
///
/// Implementations parse the page body themselves and return owned data, so
/// no parsed document outlives the call.
pub trait Extractor: Send + Sync {
    /// Extracts every job card of a listing page
    ///
    /// An empty vector means the page held no job cards at all. A card that
    /// lacks its URL or title is reported as an `Err` entry and skipped by the
    /// caller without affecting the other cards.
    fn listing(&self, page: &Document) -> Vec<Result<ListingSummary, ExtractError>>;

    /// Extracts the detail fields of a posting page
    fn detail(&self, page: &Document) -> Result<DetailFields, ExtractError>;

    /// Reads the last page number from a listing page's pagination control
    fn max_page(&self, page: &Document) -> Result<u32, ExtractError>;
}

/// Combines a listing summary and its detail fields into a candidate record
///
/// Parses the deadline, normalizes tags and attributes (including the
/// sector default). Validity is left to the caller.
pub fn build_record(summary: ListingSummary, detail: DetailFields) -> CandidateRecord {
    let url = summary.url.to_string();
    let deadline = detail.deadline_text.as_deref().and_then(parse_deadline);
    let attributes = normalize_attributes(&detail.raw_attributes, &url);

    CandidateRecord::builder(url, summary.image_url, summary.title)
        .company_name(detail.company_name.unwrap_or_default())
        .company_image_url(detail.company_image_url.unwrap_or_default())
        .description(detail.description.unwrap_or_default())
        .deadline(deadline)
        .tags(normalize_tags(&detail.tags))
        .attributes(attributes)
        .build()
}
