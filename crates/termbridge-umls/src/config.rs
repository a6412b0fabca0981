use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use termbridge_core::systems;

/// CAS endpoint that exchanges an API key for a ticket-granting ticket.
pub const DEFAULT_AUTH_URL: &str = "https://utslogin.nlm.nih.gov/cas/v1/api-key";

/// Service name the UTS REST API expects service tickets to be issued for.
pub const DEFAULT_SERVICE: &str = "http://umlsks.nlm.nih.gov";

/// UTS REST API root.
pub const DEFAULT_BASE_URL: &str = "https://uts-ws.nlm.nih.gov/rest";

/// Page size used by the UTS content endpoints.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// A TGT is valid for eight hours.
const DEFAULT_TGT_TTL_SECS: u64 = 8 * 60 * 60;

/// UMLS client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct UmlsConfig {
    /// UTS account API key. Also used as the VSAC basic-auth password.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_service")]
    pub service: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// UMLS release to query (default: "current")
    #[serde(default = "default_version")]
    pub version: String,

    /// Source vocabulary for term search (default: SNOMEDCT_US)
    #[serde(default = "default_search_source")]
    pub search_source: String,

    /// UTS search type (default: "words")
    #[serde(default = "default_search_type")]
    pub search_type: String,

    /// Source vocabulary that concepts are mapped to (default: ICD10CM)
    #[serde(default = "default_target_source")]
    pub target_source: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Upper bound on atoms pages fetched per concept
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    #[serde(default = "default_tgt_ttl_secs")]
    pub tgt_ttl_secs: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.into()
}
fn default_service() -> String {
    DEFAULT_SERVICE.into()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_version() -> String {
    "current".into()
}
fn default_search_source() -> String {
    systems::SNOMEDCT_US.into()
}
fn default_search_type() -> String {
    "words".into()
}
fn default_target_source() -> String {
    systems::ICD10CM.into()
}
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
fn default_max_pages() -> usize {
    40
}
fn default_tgt_ttl_secs() -> u64 {
    DEFAULT_TGT_TTL_SECS
}
fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for UmlsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            auth_url: default_auth_url(),
            service: default_service(),
            base_url: default_base_url(),
            version: default_version(),
            search_source: default_search_source(),
            search_type: default_search_type(),
            target_source: default_target_source(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            tgt_ttl_secs: default_tgt_ttl_secs(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl fmt::Debug for UmlsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UmlsConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("auth_url", &self.auth_url)
            .field("service", &self.service)
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("search_source", &self.search_source)
            .field("search_type", &self.search_type)
            .field("target_source", &self.target_source)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("tgt_ttl_secs", &self.tgt_ttl_secs)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

impl UmlsConfig {
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    #[must_use]
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn with_tgt_ttl(mut self, ttl: Duration) -> Self {
        self.tgt_ttl_secs = ttl.as_secs();
        self
    }

    pub fn tgt_ttl(&self) -> Duration {
        Duration::from_secs(self.tgt_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("umls.api_key must be set (or UMLS_API_KEY)".into());
        }
        if self.page_size == 0 {
            return Err("umls.page_size must be > 0".into());
        }
        if self.max_pages == 0 {
            return Err("umls.max_pages must be > 0".into());
        }
        if self.request_timeout_ms == 0 {
            return Err("umls.request_timeout_ms must be > 0".into());
        }
        Ok(())
    }
}
