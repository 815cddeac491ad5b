//! Candidate job posting records
//!
//! A `CandidateRecord` is built from a listing card plus its detail page,
//! checked for validity, and delivered downstream as JSON.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A structured job posting on its way to the delivery sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRecord {
    pub url: String,
    pub company_name: String,
    pub company_image_url: String,
    pub image_url: String,
    pub title: String,
    pub description: String,
    pub deadline_valid: bool,
    pub deadline: Option<NaiveDate>,
    #[serde(rename = "job_tags")]
    pub tags: BTreeSet<String>,
    #[serde(rename = "job_definitions")]
    pub attributes: BTreeMap<String, BTreeSet<String>>,
}

impl CandidateRecord {
    /// Starts a record from the fields known on the listing page
    pub fn builder(
        url: impl Into<String>,
        image_url: impl Into<String>,
        title: impl Into<String>,
    ) -> CandidateRecordBuilder {
        CandidateRecordBuilder {
            record: CandidateRecord {
                url: url.into(),
                company_name: String::new(),
                company_image_url: String::new(),
                image_url: image_url.into(),
                title: title.into(),
                description: String::new(),
                deadline_valid: false,
                deadline: None,
                tags: BTreeSet::new(),
                attributes: BTreeMap::new(),
            },
        }
    }

    /// A record is deliverable only if url, company name, title and
    /// description are all non-blank
    pub fn is_valid(&self) -> bool {
        !is_blank(&self.url)
            && !is_blank(&self.company_name)
            && !is_blank(&self.title)
            && !is_blank(&self.description)
    }
}

impl fmt::Display for CandidateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.description.chars().take(20).collect();
        write!(
            f,
            "{} | {} | {} | deadline={} | tags={:?} | attributes={:?} | {}...",
            self.url,
            self.company_name,
            self.title,
            self.deadline
                .map(|d| d.to_string())
                .unwrap_or_else(|| "none".to_string()),
            self.tags,
            self.attributes,
            preview
        )
    }
}

/// Builder filling in the detail-page fields of a `CandidateRecord`
#[derive(Debug, Clone)]
pub struct CandidateRecordBuilder {
    record: CandidateRecord,
}

impl CandidateRecordBuilder {
    pub fn company_name(mut self, company_name: impl Into<String>) -> Self {
        self.record.company_name = company_name.into();
        self
    }

    pub fn company_image_url(mut self, company_image_url: impl Into<String>) -> Self {
        self.record.company_image_url = company_image_url.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.record.description = description.into();
        self
    }

    /// Sets the deadline; `deadline_valid` follows whether one is present
    pub fn deadline(mut self, deadline: Option<NaiveDate>) -> Self {
        self.record.deadline_valid = deadline.is_some();
        self.record.deadline = deadline;
        self
    }

    pub fn tags(mut self, tags: BTreeSet<String>) -> Self {
        self.record.tags = tags;
        self
    }

    pub fn attributes(mut self, attributes: BTreeMap<String, BTreeSet<String>>) -> Self {
        self.record.attributes = attributes;
        self
    }

    pub fn build(self) -> CandidateRecord {
        self.record
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
