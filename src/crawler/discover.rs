//! Link discovery on search-result pages
//!
//! Search pages embed their result list as a JSON blob inside the markup.
//! Rather than walking the DOM, discovery works on the serialized document:
//!
//! # Marker pattern, version 1
//!
//! 1. Serialize the document back to text.
//! 2. Split the text on `,`.
//! 3. Keep fragments containing `"link":"/company/`.
//! 4. Drop the first 8 characters (`"link":"`) and the last character (the
//!    closing quote) of each kept fragment.
//! 5. Prefix the site origin.
//!
//! A kept fragment whose remainder does not start with `/company/` no longer
//! follows this layout and is counted as drift. A page with no marker at all,
//! or with only drifted fragments, is reported as a [`DiscoveryError`] so
//! upstream markup changes are visible instead of silently yielding nothing.

use scraper::Html;
use thiserror::Error;

/// Version of the marker layout understood by [`MarkerFragmentDiscoverer`]
pub const MARKER_PATTERN_VERSION: u32 = 1;

/// Substring identifying a result link inside the serialized markup
pub const LINK_MARKER: &str = r#""link":"/company/"#;

const FRAGMENT_PREFIX_CHARS: usize = 8;
const FRAGMENT_SUFFIX_CHARS: usize = 1;
const LINK_PATH_PREFIX: &str = "/company/";

/// Errors signalling that a page no longer matches the expected layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("no link marker found (pattern v{version})")]
    NoMarker { version: u32 },

    #[error("{drifted} marker fragment(s) did not match pattern v{version}, first: {sample}")]
    PatternDrift {
        version: u32,
        drifted: usize,
        sample: String,
    },
}

/// Strategy for pulling candidate detail-page links out of a search page
pub trait LinkDiscoverer {
    /// Returns the distinct absolute links in first-seen order
    ///
    /// # Arguments
    ///
    /// * `document` - The parsed search-result page
    /// * `origin` - Scheme and host prefixed to relative links
    fn discover(&self, document: &Html, origin: &str) -> Result<Vec<String>, DiscoveryError>;
}

/// Default discoverer implementing marker pattern version 1
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerFragmentDiscoverer;

impl LinkDiscoverer for MarkerFragmentDiscoverer {
    fn discover(&self, document: &Html, origin: &str) -> Result<Vec<String>, DiscoveryError> {
        discover_in_markup(&document.html(), origin)
    }
}

/// Applies marker pattern v1 to serialized markup
pub fn discover_in_markup(markup: &str, origin: &str) -> Result<Vec<String>, DiscoveryError> {
    let mut links: Vec<String> = Vec::new();
    let mut drifted: Vec<&str> = Vec::new();

    for fragment in markup.split(',').filter(|f| f.contains(LINK_MARKER)) {
        match link_path(fragment) {
            Some(path) => {
                let link = format!("{}{}", origin, path);
                if !links.contains(&link) {
                    links.push(link);
                }
            }
            None => drifted.push(fragment),
        }
    }

    if !drifted.is_empty() {
        tracing::warn!(
            "{} marker fragment(s) skipped, pattern v{} mismatch",
            drifted.len(),
            MARKER_PATTERN_VERSION
        );
    }

    if links.is_empty() {
        return Err(match drifted.first() {
            Some(sample) => DiscoveryError::PatternDrift {
                version: MARKER_PATTERN_VERSION,
                drifted: drifted.len(),
                sample: sample.trim().to_string(),
            },
            None => DiscoveryError::NoMarker {
                version: MARKER_PATTERN_VERSION,
            },
        });
    }

    Ok(links)
}

/// Strips the fixed prefix and suffix from a marker fragment
///
/// Returns `None` when the remainder is not a `/company/` path.
fn link_path(fragment: &str) -> Option<&str> {
    let start = fragment
        .char_indices()
        .nth(FRAGMENT_PREFIX_CHARS)
        .map(|(i, _)| i)?;
    let end = fragment
        .char_indices()
        .rev()
        .nth(FRAGMENT_SUFFIX_CHARS - 1)
        .map(|(i, _)| i)?;

    if end < start {
        return None;
    }

    let path = &fragment[start..end];
    path.starts_with(LINK_PATH_PREFIX).then_some(path)
}
