use std::sync::Arc;

use crate::Result;
use crate::config::UmlsConfig;
use crate::error::UmlsError;
use crate::ticket::{TicketManager, TicketSource};

/// Client for the UTS REST API.
///
/// Every request carries a fresh service ticket from the configured
/// [`TicketSource`].
#[derive(Clone)]
pub struct UmlsClient {
    http: reqwest::Client,
    pub(crate) config: UmlsConfig,
    tickets: Arc<dyn TicketSource>,
}

impl UmlsClient {
    /// Creates a client backed by a [`TicketManager`] sharing the same HTTP client.
    pub fn new(config: UmlsConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        let tickets = Arc::new(TicketManager::new(http.clone(), &config));
        Ok(Self {
            http,
            config,
            tickets,
        })
    }

    /// Creates a client that obtains service tickets from `tickets`.
    pub fn with_ticket_source(config: UmlsConfig, tickets: Arc<dyn TicketSource>) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self {
            http,
            config,
            tickets,
        })
    }

    pub fn config(&self) -> &UmlsConfig {
        &self.config
    }

    /// Joins `path` onto the configured REST base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Sends `GET url?params&ticket=<fresh service ticket>`.
    pub(crate) async fn get_with_ticket(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response> {
        let ticket = self.tickets.service_ticket().await?;
        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .query(params)
            .query(&[("ticket", ticket.as_str())])
            .send()
            .await?;
        Ok(response)
    }
}

fn build_http_client(config: &UmlsConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| UmlsError::HttpClient(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let client =
            UmlsClient::new(UmlsConfig::default().with_base_url("https://uts.example/rest/")).unwrap();
        assert_eq!(
            client.endpoint("/search/current"),
            "https://uts.example/rest/search/current"
        );
        assert_eq!(
            client.endpoint("content/current/CUI/C0004096/atoms"),
            "https://uts.example/rest/content/current/CUI/C0004096/atoms"
        );
    }
}
