//! Term search against `GET /search/{version}`.

use std::collections::HashSet;

use serde::Deserialize;
use termbridge_core::{Concept, CoreError};

use crate::Result;
use crate::client::UmlsClient;
use crate::error::UmlsError;

/// `ui` UTS returns for the placeholder hit of an empty search.
const NO_RESULTS_UI: &str = "NONE";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: SearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    ui: String,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "rootSource")]
    root_source: Option<String>,
}

impl UmlsClient {
    /// Searches the configured source vocabulary for `term`.
    ///
    /// Returns one [`Concept`] per distinct CUI, in UTS ranking order.
    pub async fn search_terms(&self, term: &str) -> Result<Vec<Concept>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(CoreError::invalid_input("search term must not be empty").into());
        }

        let url = self.endpoint(&format!("search/{}", self.config.version));
        let params = [
            ("string", term.to_string()),
            ("sabs", self.config.search_source.clone()),
            ("searchType", self.config.search_type.clone()),
        ];

        let response = self.get_with_ticket(&url, &params).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(term, status = status.as_u16(), "UMLS search failed");
            return Err(UmlsError::HttpStatus {
                operation: "search",
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| UmlsError::Parse(e.to_string()))?;

        let concepts = filter_hits(body.result.results, &self.config.search_source);
        tracing::info!(term, results = concepts.len(), "UMLS search completed");
        Ok(concepts)
    }
}

/// Drops the "NONE" placeholder, blank ids and repeated CUIs.
fn filter_hits(hits: Vec<SearchHit>, default_system: &str) -> Vec<Concept> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| !hit.ui.trim().is_empty() && hit.ui != NO_RESULTS_UI)
        .filter(|hit| seen.insert(hit.ui.clone()))
        .map(|hit| {
            let system = hit
                .root_source
                .unwrap_or_else(|| default_system.to_string());
            Concept::new(hit.ui, hit.name).with_system(system)
        })
        .collect()
}
