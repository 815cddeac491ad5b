//! Data-driven extraction from CSS selector rules

use crate::config::{AttributeRule, ExtractionRules, FieldQuery, LabelledQuery, PaginationRule};
use crate::crawler::Document;
use crate::extract::html::{own_text, selector, text, CompiledQuery};
use crate::extract::{DetailFields, ExtractError, Extractor, ListingSummary};
use crate::url::{canonical_url, page_param, resolve_link};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Extractor driven by a site's `[site.rules]` table
///
/// Every selector is parsed once, when the extractor is built.
#[derive(Debug, Clone)]
pub struct SelectorExtractor {
    card: Selector,
    url: CompiledQuery,
    title: CompiledQuery,
    image: Option<CompiledQuery>,
    company: Option<CompiledQuery>,
    company_image: Option<CompiledQuery>,
    description: Option<CompiledQuery>,
    deadline: Option<CompiledQuery>,
    deadline_label: Option<LabelledSelectors>,
    tags: Option<CompiledQuery>,
    attributes: Option<AttributeSelectors>,
    pagination: Option<PaginationSelectors>,
}

#[derive(Debug, Clone)]
struct LabelledSelectors {
    item: Selector,
    label: Selector,
    label_text: String,
    value: Selector,
}

impl LabelledSelectors {
    fn new(rule: &LabelledQuery) -> Result<Self, ExtractError> {
        Ok(Self {
            item: selector(&rule.item)?,
            label: selector(&rule.label)?,
            label_text: rule.label_text.trim().to_lowercase(),
            value: selector(&rule.value)?,
        })
    }
}

#[derive(Debug, Clone)]
struct AttributeSelectors {
    item: Selector,
    label: Selector,
    value: Option<Selector>,
}

impl AttributeSelectors {
    fn new(rule: &AttributeRule) -> Result<Self, ExtractError> {
        Ok(Self {
            item: selector(&rule.item)?,
            label: selector(&rule.label)?,
            value: rule.value.as_deref().map(selector).transpose()?,
        })
    }
}

#[derive(Debug, Clone)]
struct PaginationSelectors {
    item: Selector,
    link: Selector,
    page_param: String,
}

impl PaginationSelectors {
    fn new(rule: &PaginationRule) -> Result<Self, ExtractError> {
        Ok(Self {
            item: selector(&rule.item)?,
            link: selector("a[href]")?,
            page_param: rule.page_param.clone(),
        })
    }
}

fn compile(query: &Option<FieldQuery>) -> Result<Option<CompiledQuery>, ExtractError> {
    query.as_ref().map(CompiledQuery::new).transpose()
}

impl SelectorExtractor {
    /// Builds an extractor, parsing every selector of `rules`
    pub fn new(rules: &ExtractionRules) -> Result<Self, ExtractError> {
        Ok(Self {
            card: selector(&rules.card)?,
            url: CompiledQuery::new(&rules.url)?,
            title: CompiledQuery::new(&rules.title)?,
            image: compile(&rules.image)?,
            company: compile(&rules.company)?,
            company_image: compile(&rules.company_image)?,
            description: compile(&rules.description)?,
            deadline: compile(&rules.deadline)?,
            deadline_label: rules
                .deadline_label
                .as_ref()
                .map(LabelledSelectors::new)
                .transpose()?,
            tags: compile(&rules.tags)?,
            attributes: rules
                .attributes
                .as_ref()
                .map(AttributeSelectors::new)
                .transpose()?,
            pagination: rules
                .pagination
                .as_ref()
                .map(PaginationSelectors::new)
                .transpose()?,
        })
    }

    fn summary(
        &self,
        card: ElementRef<'_>,
        page_url: &Url,
    ) -> Result<ListingSummary, ExtractError> {
        let raw_url = self
            .url
            .first(card, page_url)
            .ok_or_else(|| ExtractError::MissingField {
                field: "url",
                url: page_url.to_string(),
            })?;

        let invalid = || ExtractError::InvalidUrl {
            value: raw_url.clone(),
            url: page_url.to_string(),
        };
        let resolved = resolve_link(&raw_url, page_url).ok_or_else(invalid)?;
        let url = canonical_url(resolved.as_str()).map_err(|_| invalid())?;

        let title = self
            .title
            .first(card, page_url)
            .ok_or_else(|| ExtractError::MissingField {
                field: "title",
                url: url.to_string(),
            })?;

        let image_url = self
            .image
            .as_ref()
            .and_then(|query| query.first(card, page_url))
            .unwrap_or_default();

        Ok(ListingSummary {
            url,
            image_url,
            title,
        })
    }

    fn labelled_value(root: ElementRef<'_>, rule: &LabelledSelectors) -> Option<String> {
        for item in root.select(&rule.item) {
            let Some(label) = item.select(&rule.label).next() else {
                continue;
            };
            if !text(label).to_lowercase().contains(&rule.label_text) {
                continue;
            }
            if let Some(value) = item.select(&rule.value).next() {
                let value = text(value);
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }

        None
    }

    fn attributes(&self, root: ElementRef<'_>) -> Vec<(String, String)> {
        let Some(rule) = &self.attributes else {
            return Vec::new();
        };

        let mut pairs = Vec::new();
        for item in root.select(&rule.item) {
            let Some(label) = item.select(&rule.label).next() else {
                continue;
            };
            let label = text(label);
            if label.is_empty() {
                continue;
            }

            match &rule.value {
                Some(value_selector) => {
                    for value in item.select(value_selector) {
                        pairs.push((label.clone(), text(value)));
                    }
                }
                None => pairs.push((label, own_text(item))),
            }
        }

        pairs
    }
}

impl Extractor for SelectorExtractor {
    fn listing(&self, page: &Document) -> Vec<Result<ListingSummary, ExtractError>> {
        let document = Html::parse_document(&page.body);
        document
            .root_element()
            .select(&self.card)
            .map(|card| self.summary(card, &page.url))
            .collect()
    }

    fn detail(&self, page: &Document) -> Result<DetailFields, ExtractError> {
        let document = Html::parse_document(&page.body);
        let root = document.root_element();

        let optional = |query: &Option<CompiledQuery>| {
            query.as_ref().and_then(|query| query.first(root, &page.url))
        };

        let description = self
            .description
            .as_ref()
            .map(|query| query.all(root, &page.url))
            .filter(|parts| !parts.is_empty())
            .map(|parts| parts.join("\n"));

        let deadline_text = optional(&self.deadline).or_else(|| {
            self.deadline_label
                .as_ref()
                .and_then(|rule| Self::labelled_value(root, rule))
        });

        let tags = self
            .tags
            .as_ref()
            .map(|query| query.all(root, &page.url))
            .unwrap_or_default();

        Ok(DetailFields {
            company_name: optional(&self.company),
            company_image_url: optional(&self.company_image),
            description,
            deadline_text,
            tags,
            raw_attributes: self.attributes(root),
        })
    }

    fn max_page(&self, page: &Document) -> Result<u32, ExtractError> {
        let failure = |reason: &str| ExtractError::MaxPage {
            url: page.url.to_string(),
            reason: reason.to_string(),
        };

        let rule = self
            .pagination
            .as_ref()
            .ok_or_else(|| failure("no pagination rule"))?;

        let document = Html::parse_document(&page.body);
        let last = document
            .root_element()
            .select(&rule.item)
            .last()
            .ok_or_else(|| failure("pagination control not found"))?;

        let href = match last.value().attr("href") {
            Some(href) => href.to_string(),
            None => last
                .select(&rule.link)
                .next()
                .and_then(|link| link.value().attr("href"))
                .map(str::to_string)
                .ok_or_else(|| failure("last pagination item has no link"))?,
        };

        let link = resolve_link(&href, &page.url).ok_or_else(|| failure("unresolvable link"))?;
        page_param(&link, &rule.page_param)
            .filter(|max| *max > 0)
            .ok_or_else(|| failure("page parameter missing or not a number"))
    }
}
