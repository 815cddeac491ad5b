//! HTML reading helpers shared by extraction strategies

use crate::config::{FieldQuery, QueryMode};
use crate::extract::ExtractError;
use crate::url::resolve_link;
use scraper::{ElementRef, Selector};
use url::Url;

/// Parses a CSS selector
pub fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css.to_string()))
}

/// A field query with its selector parsed once
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    selector: Selector,
    query: FieldQuery,
}

impl CompiledQuery {
    pub fn new(query: &FieldQuery) -> Result<Self, ExtractError> {
        Ok(Self {
            selector: selector(&query.selector)?,
            query: query.clone(),
        })
    }

    /// Reads the first match within `scope`
    ///
    /// Returns None when nothing matches or the value is blank.
    pub fn first(&self, scope: ElementRef<'_>, base_url: &Url) -> Option<String> {
        scope
            .select(&self.selector)
            .next()
            .and_then(|element| read(element, &self.query, base_url))
    }

    /// Reads every match within `scope`, skipping blank values
    pub fn all(&self, scope: ElementRef<'_>, base_url: &Url) -> Vec<String> {
        scope
            .select(&self.selector)
            .filter_map(|element| read(element, &self.query, base_url))
            .collect()
    }
}

/// Reads a value from an element according to the query mode
pub fn read(element: ElementRef<'_>, query: &FieldQuery, base_url: &Url) -> Option<String> {
    let value = match query.mode {
        QueryMode::Text => text(element),
        QueryMode::OwnText => own_text(element),
        QueryMode::Html => element.inner_html().trim().to_string(),
        QueryMode::Attr => {
            let name = query.attr.as_deref()?;
            let raw = element.value().attr(name)?;
            if query.absolute {
                resolve_link(raw, base_url)?.to_string()
            } else {
                raw.trim().to_string()
            }
        }
    };

    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// All descendant text with whitespace collapsed
pub fn text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Only the element's direct text nodes, whitespace collapsed
pub fn own_text(element: ElementRef<'_>) -> String {
    let raw = element
        .children()
        .filter_map(|child| child.value().as_text().map(|text| text.to_string()))
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&raw)
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
