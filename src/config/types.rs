use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Job-Trawler
///
/// Every section is optional; an empty file yields the defaults below.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default = "default_identities")]
    pub identity: Vec<IdentityEntry>,
}

/// Search query and pagination configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// National site subdomain (e.g. "de", "uk")
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Search term sent as the `q` parameter
    #[serde(default = "default_query")]
    pub query: String,

    #[serde(default = "default_city")]
    pub city: String,

    /// Search radius around the city
    #[serde(default = "default_radius")]
    pub radius: u32,

    /// Term every result must contain (`as_any` parameter)
    #[serde(default, rename = "must-contain")]
    pub must_contain: String,

    /// Number of results to walk through
    #[serde(default = "default_count")]
    pub count: u32,

    /// Offset step between result pages
    #[serde(default = "default_page_size", rename = "page-size")]
    pub page_size: u32,

    /// Pause between consecutive search pages (milliseconds)
    #[serde(default = "default_page_delay_ms", rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Overrides the `https://{locale}.indeed.com` origin
    #[serde(default, rename = "base-url")]
    pub base_url: Option<String>,
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the CSV export, database and log
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Log file name, relative to `directory`
    #[serde(default = "default_log_file", rename = "log-file")]
    pub log_file: String,
}

/// CSS selectors locating each field on a detail page
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_title_selector")]
    pub title: String,

    #[serde(default = "default_company_selector")]
    pub company: String,

    #[serde(default = "default_salary_selector")]
    pub salary: String,

    #[serde(default = "default_summary_selector")]
    pub summary: String,

    /// Containers scanned for the location
    #[serde(
        default = "default_location_container_selector",
        rename = "location-container"
    )]
    pub location_container: String,

    /// Nested node whose last occurrence holds the location
    #[serde(default = "default_location_node_selector", rename = "location-node")]
    pub location_node: String,
}

/// One outbound client identity: a set of request headers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityEntry {
    pub headers: BTreeMap<String, String>,
}

impl IdentityEntry {
    /// Creates an identity that only sets a User-Agent
    pub fn with_user_agent(user_agent: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), user_agent.to_string());
        Self { headers }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            output: OutputConfig::default(),
            selectors: SelectorConfig::default(),
            identity: default_identities(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            query: default_query(),
            city: default_city(),
            radius: default_radius(),
            must_contain: String::new(),
            count: default_count(),
            page_size: default_page_size(),
            page_delay_ms: default_page_delay_ms(),
            base_url: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            log_file: default_log_file(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            title: default_title_selector(),
            company: default_company_selector(),
            salary: default_salary_selector(),
            summary: default_summary_selector(),
            location_container: default_location_container_selector(),
            location_node: default_location_node_selector(),
        }
    }
}

fn default_locale() -> String {
    "de".to_string()
}

fn default_query() -> String {
    "python".to_string()
}

fn default_city() -> String {
    "Berlin".to_string()
}

fn default_radius() -> u32 {
    25
}

fn default_count() -> u32 {
    50
}

fn default_page_size() -> u32 {
    10
}

fn default_page_delay_ms() -> u64 {
    1000
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_log_file() -> String {
    "scraper.log".to_string()
}

// Whole-attribute matches: these nodes are identified by their exact class list
fn default_title_selector() -> String {
    r#"h1[class="icl-u-xs-mb--xs icl-u-xs-mt--none jobsearch-JobInfoHeader-title"]"#.to_string()
}

fn default_company_selector() -> String {
    r#"div[class="icl-u-lg-mr--sm icl-u-xs-mr--xs"]"#.to_string()
}

fn default_salary_selector() -> String {
    "span.icl-u-xs-mr--xs".to_string()
}

fn default_summary_selector() -> String {
    "div.jobsearch-jobDescriptionText".to_string()
}

fn default_location_container_selector() -> String {
    "div.jobsearch-CompanyInfoWithoutHeaderImage".to_string()
}

fn default_location_node_selector() -> String {
    "div".to_string()
}

/// Built-in pool of desktop browser identities
pub fn default_identities() -> Vec<IdentityEntry> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:120.0) Gecko/20100101 Firefox/120.0",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
    ]
    .iter()
    .map(|ua| IdentityEntry::with_user_agent(ua))
    .collect()
}
