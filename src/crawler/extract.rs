//! Field extraction from job detail pages
//!
//! Each field is located by one CSS selector. A field whose node is missing
//! becomes the empty string; extraction as a whole never fails.

use crate::config::SelectorConfig;
use crate::record::JobFields;
use crate::{Result, ScraperError};
use scraper::{ElementRef, Html, Selector};

/// Extracts the structured fields of a job posting
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    title: Selector,
    company: Selector,
    salary: Selector,
    summary: Selector,
    location_container: Selector,
    location_node: Selector,
}

impl DetailExtractor {
    /// Compiles the configured field selectors
    pub fn new(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            title: compile("title", &config.title)?,
            company: compile("company", &config.company)?,
            salary: compile("salary", &config.salary)?,
            summary: compile("summary", &config.summary)?,
            location_container: compile("location-container", &config.location_container)?,
            location_node: compile("location-node", &config.location_node)?,
        })
    }

    /// Extracts all five fields from a detail page
    pub fn extract(&self, document: &Html) -> JobFields {
        JobFields {
            title: text_or_default(document, &self.title),
            company: text_or_default(document, &self.company),
            salary: text_or_default(document, &self.salary),
            summary: text_or_default(document, &self.summary),
            location: self.extract_location(document),
        }
    }

    /// Scans every location container and keeps the text of the last nested
    /// location node, across all containers
    fn extract_location(&self, document: &Html) -> String {
        let mut location = String::new();

        for container in document.select(&self.location_container) {
            if let Some(node) = container.select(&self.location_node).last() {
                location = element_text(node);
            }
        }

        location
    }
}

/// Returns the trimmed text of the first node matching `selector`, or an
/// empty string when there is none
pub fn text_or_default(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn compile(field: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScraperError::Selector {
        field: field.to_string(),
        message: format!("{:?}", e),
    })
}
