use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://cts.nlm.nih.gov/fhir/";

/// VSAC connection settings. The API key is shared with UMLS and supplied
/// separately to [`crate::VsacClient::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VsacConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `_count` sent with value set searches
    #[serde(default = "default_search_count")]
    pub search_count: u32,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_search_count() -> u32 {
    20
}
fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for VsacConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_count: default_search_count(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl VsacConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_search_count(mut self, count: u32) -> Self {
        self.search_count = count;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("vsac.base_url must not be empty".into());
        }
        if self.search_count == 0 {
            return Err("vsac.search_count must be > 0".into());
        }
        if self.request_timeout_ms == 0 {
            return Err("vsac.request_timeout_ms must be > 0".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VsacConfig::default();
        assert_eq!(config.base_url, "https://cts.nlm.nih.gov/fhir/");
        assert_eq!(config.search_count, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_count_is_invalid() {
        assert!(VsacConfig::default().with_search_count(0).validate().is_err());
    }
}
