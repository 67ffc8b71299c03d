//! Outbound client identity rotation
//!
//! Each request carries one header set picked uniformly at random from a
//! fixed pool. Nothing is remembered between picks, so repeats are possible.

use crate::config::IdentityEntry;
use crate::{Result, ScraperError};
use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// A header set ready to attach to a request
pub type HeaderSet = HeaderMap;

/// Picks a random identity for every outbound request
#[derive(Debug, Clone)]
pub struct IdentityRotator {
    pool: Vec<HeaderSet>,
}

impl IdentityRotator {
    /// Builds a rotator from configured identities
    ///
    /// # Returns
    ///
    /// * `Ok(IdentityRotator)` - Pool converted to header maps
    /// * `Err(ScraperError)` - Pool is empty or a header is malformed
    pub fn new(identities: &[IdentityEntry]) -> Result<Self> {
        if identities.is_empty() {
            return Err(ScraperError::EmptyIdentityPool);
        }

        let pool = identities
            .iter()
            .map(to_header_set)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { pool })
    }

    /// Returns one header set chosen uniformly at random
    pub fn pick(&self) -> &HeaderSet {
        // The pool is never empty after construction
        self.pool
            .choose(&mut rand::thread_rng())
            .unwrap_or(&self.pool[0])
    }

    /// Number of identities in the pool
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

fn to_header_set(identity: &IdentityEntry) -> Result<HeaderSet> {
    let mut headers = HeaderMap::new();

    for (name, value) in &identity.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ScraperError::InvalidHeader {
                name: name.clone(),
                message: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ScraperError::InvalidHeader {
            name: name.clone(),
            message: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
