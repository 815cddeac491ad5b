use serde::Deserialize;

/// Main configuration structure for Jobscan
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    pub delivery: DeliveryConfig,
    pub storage: StorageConfig,
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteDescriptor>,
}

/// HTTP fetching behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Browser user agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header value
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per URL before giving up
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,

    /// Fixed sleep between attempts (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_secs: default_timeout_secs(),
            max_tries: default_max_tries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Scan loop behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScanConfig {
    /// Number of empty listing pages after which a site's scan halts
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
        }
    }
}

/// Downstream REST API the scanned postings are posted to
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeliveryConfig {
    /// Host name or IP address, without scheme
    pub ip: String,

    /// Optional port; plain HTTP is used when a port is set
    #[serde(default)]
    pub port: Option<u16>,

    /// Path of the endpoint, without leading slash
    pub path: String,

    /// Name of the JSON array wrapping the posted records
    pub request_param: String,

    /// When false, batches are never posted and nothing is marked as seen
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl DeliveryConfig {
    /// Full URL of the delivery endpoint
    pub fn endpoint(&self) -> String {
        let path = self.path.trim_start_matches('/');
        match self.port {
            Some(port) => format!("http://{}:{}/{}", self.ip, port, path),
            None => format!("https://{}/{}", self.ip, path),
        }
    }

    /// Identity used to scope dedup entries to this delivery target
    pub fn identity(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.ip, port),
            None => self.ip.clone(),
        }
    }
}

/// Dedup store location
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

/// Immutable per-site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SiteDescriptor {
    /// Symbolic name, used by the disable list and in logs
    pub name: String,

    /// URL of the first listing page
    pub base_url: String,

    /// URL of any later listing page; `{page}` is replaced by the encoded page
    pub paged_url: String,

    /// Page number of the first listing page
    #[serde(default = "default_initial_page")]
    pub initial_page: u32,

    /// Whether the scan is bounded by a discovered max page
    #[serde(default)]
    pub pagination: PaginationStyle,

    /// How a logical page number is written into `paged_url`
    #[serde(default)]
    pub page_encoding: PageEncoding,

    /// Field extraction rules
    pub rules: ExtractionRules,
}

/// Pagination style of a site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaginationStyle {
    /// Stops on empty results or fetch failure
    #[default]
    Open,
    /// Requires discovering the max page before the scan starts
    Bounded,
}

/// Mapping from a logical page number to the number placed in the URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum PageEncoding {
    /// Page N is written as N
    #[default]
    Linear,
    /// Page N is written as N * page-size
    Offset {
        #[serde(rename = "page-size")]
        page_size: u32,
    },
}

impl PageEncoding {
    /// Encodes a logical page number
    pub fn encode(&self, page: u32) -> u64 {
        match self {
            Self::Linear => u64::from(page),
            Self::Offset { page_size } => u64::from(page) * u64::from(*page_size),
        }
    }
}

/// How the value of a matched element is read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryMode {
    /// All descendant text, whitespace collapsed
    #[default]
    Text,
    /// Only the element's direct text nodes
    OwnText,
    /// Inner HTML
    Html,
    /// An attribute value; see `FieldQuery::attr`
    Attr,
}

/// A CSS selector plus the way its first match is read
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldQuery {
    pub selector: String,

    #[serde(default)]
    pub mode: QueryMode,

    /// Attribute name for `mode = "attr"`
    #[serde(default)]
    pub attr: Option<String>,

    /// Resolve the value against the page URL
    #[serde(default)]
    pub absolute: bool,
}

/// Label/value list extraction (e.g. a "facts" box on a detail page)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AttributeRule {
    /// One match per label/value pair
    pub item: String,

    /// Label element inside an item
    pub label: String,

    /// Value elements inside an item; the item's own text when absent
    #[serde(default)]
    pub value: Option<String>,
}

/// Label/value lookup for the deadline, e.g. a list item labelled "Frist"
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LabelledQuery {
    pub item: String,
    pub label: String,

    /// Label text to look for, compared case-insensitively
    pub label_text: String,

    pub value: String,
}

/// Pagination control used for max-page discovery
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PaginationRule {
    /// Items of the pagination control; the last one holds the last page
    pub item: String,

    /// Query parameter carrying the page number in the item's link
    #[serde(default = "default_page_param")]
    pub page_param: String,
}

/// Per-site CSS extraction rule set
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtractionRules {
    /// One match per job posting card on a listing page
    pub card: String,

    // Listing card fields
    pub url: FieldQuery,
    pub title: FieldQuery,
    #[serde(default)]
    pub image: Option<FieldQuery>,

    // Detail page fields
    #[serde(default)]
    pub company: Option<FieldQuery>,
    #[serde(default)]
    pub company_image: Option<FieldQuery>,
    #[serde(default)]
    pub description: Option<FieldQuery>,
    #[serde(default)]
    pub deadline: Option<FieldQuery>,
    #[serde(default)]
    pub deadline_label: Option<LabelledQuery>,
    #[serde(default)]
    pub tags: Option<FieldQuery>,
    #[serde(default)]
    pub attributes: Option<AttributeRule>,

    /// Required for bounded pagination
    #[serde(default)]
    pub pagination: Option<PaginationRule>,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/123.0.0.0 Mobile Safari/537.36"
        .to_string()
}

fn default_accept_language() -> String {
    "nb-NO,nb;q=0.9".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_tries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    5000
}

fn default_failure_threshold() -> u32 {
    5
}

fn default_initial_page() -> u32 {
    1
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_true() -> bool {
    true
}
