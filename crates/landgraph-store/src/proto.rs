//! Catalog client: fetches the proto-descriptor listing and one document per
//! listed file, sequentially.
//!
//! Refreshes carry an explicit generation: starting a new fetch bumps the
//! counter, and a fetch that finds itself stale after an await returns
//! nothing instead of letting its results overwrite newer ones.

use std::sync::atomic::{AtomicU64, Ordering};

use landgraph_core::Catalog;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;

#[derive(Debug)]
pub struct CatalogClient {
    client: reqwest::Client,
    host: String,
    list_path: String,
    generation: AtomicU64,
}

impl CatalogClient {
    pub fn new(host: impl Into<String>, list_path: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.into(),
            list_path: list_path.into(),
            generation: AtomicU64::new(0),
        }
    }

    fn stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) != generation
    }

    /// Fetches the whole catalog. Returns `None` when a newer refresh started
    /// while this one was in flight; the caller discards the result.
    /// Malformed documents degrade per-entry and never abort the fetch.
    pub async fn fetch(&self) -> Result<Option<Catalog>> {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        let listing: Vec<String> = self
            .client
            .get(format!("{}{}", self.host, self.list_path))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if self.stale(generation) {
            debug!(generation, "catalog listing superseded, discarding");
            return Ok(None);
        }

        let mut catalog = Catalog::new();
        for path in &listing {
            let document: Value = self
                .client
                .get(format!("{}{path}", self.host))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            if self.stale(generation) {
                debug!(generation, "catalog fetch superseded, discarding");
                return Ok(None);
            }
            if let Err(error) = catalog.push_proto_document(&document) {
                warn!(%path, %error, "skipping malformed catalog document");
            }
        }
        debug!(
            services = catalog.services.len(),
            domains = catalog.domains.len(),
            "catalog fetched"
        );
        Ok(Some(catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_newer_refresh_invalidates_an_older_generation() {
        let client = CatalogClient::new("http://catalog", "/protos.json");
        let first = client.generation.fetch_add(1, Ordering::AcqRel) + 1;
        assert!(!client.stale(first));
        let second = client.generation.fetch_add(1, Ordering::AcqRel) + 1;
        assert!(client.stale(first));
        assert!(!client.stale(second));
    }
}
