//! Pipeline coordinator - main crawl orchestration logic
//!
//! Walks the search result pages one offset at a time. Every link found on a
//! page is fetched and extracted right away, before the next page is
//! requested. Nothing runs concurrently.

use crate::config::{Config, SearchConfig};
use crate::crawler::discover::{LinkDiscoverer, MarkerFragmentDiscoverer};
use crate::crawler::extract::DetailExtractor;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::identity::IdentityRotator;
use crate::record::JobRecord;
use crate::Result;
use std::time::Duration;
use url::Url;

/// Result of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Deduplicated records in discovery order
    pub jobs: Vec<JobRecord>,

    /// Apply URLs eligible for automated applications (non-empty, https)
    pub apply_links: Vec<String>,
}

/// Drives discovery and extraction across all result pages
pub struct Pipeline {
    search: SearchConfig,
    fetcher: Fetcher,
    rotator: IdentityRotator,
    discoverer: Box<dyn LinkDiscoverer>,
    extractor: DetailExtractor,
}

impl Pipeline {
    /// Creates a pipeline using the default marker discoverer
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Client, identity pool and selectors ready
    /// * `Err(ScraperError)` - A configured header or selector is invalid
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_discoverer(config, Box::new(MarkerFragmentDiscoverer))
    }

    /// Creates a pipeline with a custom link discovery strategy
    pub fn with_discoverer(config: &Config, discoverer: Box<dyn LinkDiscoverer>) -> Result<Self> {
        Ok(Self {
            search: config.search.clone(),
            fetcher: Fetcher::new(build_http_client()?),
            rotator: IdentityRotator::new(&config.identity)?,
            discoverer,
            extractor: DetailExtractor::new(&config.selectors)?,
        })
    }

    /// Runs the pipeline to completion
    ///
    /// Any transport failure aborts the run; pages whose markup does not
    /// match the discovery pattern are logged and contribute no links.
    pub async fn run(&self) -> Result<PipelineOutput> {
        let origin = site_origin(&self.search);
        let offsets = page_offsets(self.search.count, self.search.page_size);
        let mut jobs: Vec<JobRecord> = Vec::new();

        tracing::info!(
            "Searching '{}' in {} (radius {}), {} page(s)",
            self.search.query,
            self.search.city,
            self.search.radius,
            offsets.len()
        );

        for (index, offset) in offsets.iter().enumerate() {
            if index > 0 && self.search.page_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.search.page_delay_ms)).await;
            }

            tracing::info!("Parsing: {}", offset);
            let search_url = build_search_url(&origin, &self.search, *offset)?;
            self.process_search_page(search_url.as_str(), &origin, &mut jobs)
                .await?;
        }

        let apply_links: Vec<String> = jobs
            .iter()
            .filter(|job| job.has_secure_apply_url())
            .map(|job| job.apply_url.clone())
            .collect();

        tracing::info!(
            "Collected {} job(s), {} with a secure apply link",
            jobs.len(),
            apply_links.len()
        );

        Ok(PipelineOutput { jobs, apply_links })
    }

    /// Fetches one search page and processes each link it references
    async fn process_search_page(
        &self,
        search_url: &str,
        origin: &str,
        jobs: &mut Vec<JobRecord>,
    ) -> Result<()> {
        let links = {
            let document = self
                .fetcher
                .fetch_document(search_url, self.rotator.pick())
                .await?;
            self.discoverer.discover(&document, origin)
        };

        let links = match links {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!("No job links on {}: {}", search_url, e);
                return Ok(());
            }
        };

        for link in links {
            tracing::info!("job link added: {}", link);
            let job = self.process_detail_page(&link).await?;
            push_unique(jobs, job);
        }

        Ok(())
    }

    /// Fetches one detail page and builds its record
    async fn process_detail_page(&self, url: &str) -> Result<JobRecord> {
        let document = self
            .fetcher
            .fetch_document(url, self.rotator.pick())
            .await?;
        let fields = self.extractor.extract(&document);
        Ok(JobRecord::from_fields(fields, url))
    }
}

/// Appends a record unless an identical one (all fields equal) is present
///
/// Returns true if the record was added.
pub fn push_unique(jobs: &mut Vec<JobRecord>, job: JobRecord) -> bool {
    if jobs.contains(&job) {
        tracing::debug!("Skipping duplicate record for {}", job.apply_url);
        return false;
    }
    jobs.push(job);
    true
}

/// Scheme and host of the search site for this configuration
pub fn site_origin(search: &SearchConfig) -> String {
    match &search.base_url {
        Some(base) => base.trim_end_matches('/').to_string(),
        None => format!("https://{}.indeed.com", search.locale),
    }
}

/// Result offsets to request: 0, page_size, ... while below `count`
pub fn page_offsets(count: u32, page_size: u32) -> Vec<u32> {
    (0..count).step_by(page_size.max(1) as usize).collect()
}

/// Builds the search URL for one result offset
pub fn build_search_url(origin: &str, search: &SearchConfig, offset: u32) -> Result<Url> {
    let url = Url::parse_with_params(
        &format!("{}/jobs", origin),
        &[
            ("q", search.query.clone()),
            ("l", search.city.clone()),
            ("start", offset.to_string()),
            ("radius", search.radius.to_string()),
            ("as_any", search.must_contain.clone()),
        ],
    )?;
    Ok(url)
}
