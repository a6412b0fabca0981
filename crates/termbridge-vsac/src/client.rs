use serde_json::Value;
use termbridge_core::{ValueSetConcept, ValueSetSummary, validate_identifier};

use crate::Result;
use crate::config::VsacConfig;
use crate::error::VsacError;

const FHIR_JSON: &str = "application/fhir+json";

/// VSAC basic-auth user name; the password is the API key.
const BASIC_AUTH_USER: &str = "apikey";

#[derive(Clone)]
pub struct VsacClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    search_count: u32,
}

impl std::fmt::Debug for VsacClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VsacClient")
            .field("base_url", &self.base_url)
            .field("search_count", &self.search_count)
            .finish_non_exhaustive()
    }
}

impl VsacClient {
    pub fn new(config: &VsacConfig, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| VsacError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            search_count: config.search_count,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET ValueSet?name:contains={term}&_count={search_count}`.
    ///
    /// A bundle without `entry` is reported as [`VsacError::NoEntries`];
    /// an empty `entry` array yields an empty list.
    pub async fn search_value_sets(&self, term: &str) -> Result<Vec<ValueSetSummary>> {
        let url = format!("{}/ValueSet", self.base_url);
        let count = self.search_count.to_string();
        let bundle = self
            .get_json(&url, &[("name:contains", term), ("_count", count.as_str())])
            .await?;

        let entries = bundle
            .get("entry")
            .and_then(Value::as_array)
            .ok_or(VsacError::NoEntries)?;

        let summaries: Vec<_> = entries
            .iter()
            .filter_map(|entry| entry.get("resource"))
            .map(ValueSetSummary::from_resource)
            .collect();
        tracing::info!(term, results = summaries.len(), "VSAC value set search completed");
        Ok(summaries)
    }

    /// `GET ValueSet/{id}`, returned as-is.
    pub async fn read_value_set(&self, id: &str) -> Result<Value> {
        validate_identifier("ValueSet", id)?;
        let url = format!("{}/ValueSet/{id}", self.base_url);
        self.get_json(&url, &[]).await
    }

    /// `GET ValueSet/{id}/$expand`, flattened to `expansion.contains[]`.
    pub async fn expand_value_set(&self, id: &str) -> Result<Vec<ValueSetConcept>> {
        validate_identifier("ValueSet", id)?;
        let url = format!("{}/ValueSet/{id}/$expand", self.base_url);
        let expansion = self.get_json(&url, &[]).await?;

        let concepts: Vec<_> = expansion
            .pointer("/expansion/contains")
            .and_then(Value::as_array)
            .map(|contains| {
                contains
                    .iter()
                    .filter_map(ValueSetConcept::from_contains)
                    .collect()
            })
            .unwrap_or_default();
        tracing::debug!(value_set = id, codes = concepts.len(), "Expanded VSAC value set");
        Ok(concepts)
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let response = self
            .http
            .get(url)
            .basic_auth(BASIC_AUTH_USER, Some(&self.api_key))
            .header("Accept", FHIR_JSON)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url, error = %e, "VSAC request failed");
                VsacError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url, status = status.as_u16(), "VSAC returned an error status");
            return Err(VsacError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| VsacError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let client = VsacClient::new(&VsacConfig::default(), "k").unwrap();
        assert_eq!(client.base_url(), "https://cts.nlm.nih.gov/fhir");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = VsacClient::new(&VsacConfig::default(), "secret-key").unwrap();
        assert!(!format!("{client:?}").contains("secret-key"));
    }
}
