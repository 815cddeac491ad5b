//! Shared fixtures: site descriptors, page bodies and a recording sink

use async_trait::async_trait;
use jobscan::config::{
    ExtractionRules, FetcherConfig, FieldQuery, PageEncoding, PaginationRule, PaginationStyle,
    QueryMode, RunOptions, SiteDescriptor,
};
use jobscan::crawler::{build_http_client, DedupGate, FailureGovernor, Fetcher, ScanLoop};
use jobscan::extract::SelectorExtractor;
use jobscan::output::{DeliveryError, DeliveryResult, DeliverySink, ScanReport};
use jobscan::storage::{DedupStore, SqliteStorage};
use jobscan::CandidateRecord;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const IDENTITY: &str = "127.0.0.1:9000";

/// How the recording sink answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    Accept,
    Reject,
    Fail,
}

/// Delivery sink that remembers every batch it was offered
pub struct RecordingSink {
    mode: SinkMode,
    batches: Mutex<Vec<Vec<CandidateRecord>>>,
}

impl RecordingSink {
    pub fn new(mode: SinkMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            batches: Mutex::new(Vec::new()),
        })
    }

    pub fn batches(&self) -> Vec<Vec<CandidateRecord>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl DeliverySink for RecordingSink {
    async fn deliver(&self, records: &[CandidateRecord]) -> DeliveryResult<bool> {
        self.batches.lock().unwrap().push(records.to_vec());
        match self.mode {
            SinkMode::Accept => Ok(true),
            SinkMode::Reject => Ok(false),
            SinkMode::Fail => Err(DeliveryError::Serialization(
                serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
            )),
        }
    }
}

fn text(selector: &str) -> FieldQuery {
    FieldQuery {
        selector: selector.to_string(),
        mode: QueryMode::Text,
        attr: None,
        absolute: false,
    }
}

pub fn rules() -> ExtractionRules {
    ExtractionRules {
        card: "article.job".to_string(),
        url: FieldQuery {
            selector: "a.link".to_string(),
            mode: QueryMode::Attr,
            attr: Some("href".to_string()),
            absolute: true,
        },
        title: text("h2"),
        image: None,
        company: Some(text(".company")),
        company_image: None,
        description: Some(FieldQuery {
            selector: "section.body".to_string(),
            mode: QueryMode::Html,
            attr: None,
            absolute: false,
        }),
        deadline: Some(text(".deadline")),
        deadline_label: None,
        tags: Some(text("ul.tags li")),
        attributes: None,
        pagination: Some(PaginationRule {
            item: "ul.paginate li".to_string(),
            page_param: "page".to_string(),
        }),
    }
}

/// Open site served from `/jobs`, later pages from `/jobs/page/{page}`
pub fn site(server: &MockServer, name: &str) -> SiteDescriptor {
    SiteDescriptor {
        name: name.to_string(),
        base_url: format!("{}/{}/jobs", server.uri(), name),
        paged_url: format!("{}/{}/jobs/page/{{page}}", server.uri(), name),
        initial_page: 1,
        pagination: PaginationStyle::Open,
        page_encoding: PageEncoding::Linear,
        rules: rules(),
    }
}

pub fn bounded_site(server: &MockServer, name: &str) -> SiteDescriptor {
    SiteDescriptor {
        pagination: PaginationStyle::Bounded,
        ..site(server, name)
    }
}

/// Path of a listing page as served for `site(server, name)`
pub fn listing_path(name: &str, page: u32) -> String {
    if page == 1 {
        format!("/{}/jobs", name)
    } else {
        format!("/{}/jobs/page/{}", name, page)
    }
}

pub fn listing_html(ad_ids: &[u32]) -> String {
    let cards: String = ad_ids
        .iter()
        .map(|id| {
            format!(
                r#"<article class="job"><a class="link" href="/ad/{id}">Open</a><h2>Job {id}</h2></article>"#
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", cards)
}

pub fn empty_listing_html() -> String {
    "<html><body><p>Ingen treff</p></body></html>".to_string()
}

pub fn detail_html(id: u32) -> String {
    format!(
        r#"<html><body>
             <p class="company">Company {id}</p>
             <section class="body"><p>Description {id}</p></section>
             <span class="deadline">15.03.2030</span>
             <ul class="tags"><li>rust, tokio</li></ul>
           </body></html>"#
    )
}

pub async fn mount_listing(server: &MockServer, name: &str, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(listing_path(name, page)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_details(server: &MockServer, ad_ids: &[u32]) {
    for id in ad_ids {
        Mock::given(method("GET"))
            .and(path(format!("/ad/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_html(*id)))
            .mount(server)
            .await;
    }
}

pub fn fetcher_config() -> FetcherConfig {
    FetcherConfig {
        timeout_secs: 5,
        max_tries: 3,
        retry_delay_ms: 10,
        ..FetcherConfig::default()
    }
}

pub fn fetcher() -> Fetcher {
    let config = fetcher_config();
    Fetcher::new(build_http_client(&config).unwrap(), &config)
}

pub fn memory_store() -> Arc<dyn DedupStore> {
    Arc::new(SqliteStorage::new_in_memory().unwrap())
}

/// Builds and runs a scan loop for one site
pub async fn run_scan(
    site: SiteDescriptor,
    store: Arc<dyn DedupStore>,
    sink: Arc<dyn DeliverySink>,
    threshold: u32,
    options: RunOptions,
) -> ScanReport {
    let extractor = Arc::new(SelectorExtractor::new(&site.rules).unwrap());
    ScanLoop::new(
        Arc::new(site),
        extractor,
        fetcher(),
        DedupGate::new(store, IDENTITY),
        sink,
        FailureGovernor::new(threshold),
        Arc::new(options),
    )
    .run()
    .await
}
