//! UMLS CAS ticket lifecycle.
//!
//! 1. `POST {auth_url}` with `apikey=<key>` answers `201 Created`; the
//!    `Location` header is the ticket-granting ticket (TGT) URL.
//! 2. `POST <tgt url>` with `service=<service>` answers `200 OK`; the body is
//!    a single-use service ticket.
//!
//! [`TicketManager`] keeps the TGT for its validity window and mints a fresh
//! service ticket for every REST call. Both steps fail closed: any other status
//! is an error and nothing is retried.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use tokio::sync::RwLock;

use crate::Result;
use crate::config::UmlsConfig;
use crate::error::UmlsError;

/// Source of single-use service tickets.
#[async_trait]
pub trait TicketSource: Send + Sync {
    /// Returns a ticket valid for exactly one UTS REST call.
    async fn service_ticket(&self) -> Result<ServiceTicket>;
}

/// A ticket-granting ticket and the moment it was issued.
#[derive(Clone)]
pub struct TicketGrantingTicket {
    url: String,
    acquired_at: Instant,
}

impl TicketGrantingTicket {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            acquired_at: Instant::now(),
        }
    }

    /// URL that service tickets are requested from.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn age(&self) -> Duration {
        self.acquired_at.elapsed()
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }
}

impl fmt::Debug for TicketGrantingTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketGrantingTicket")
            .field("url", &"***")
            .field("age", &self.age())
            .finish()
    }
}

/// A single-use service ticket.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceTicket(String);

impl ServiceTicket {
    pub fn new(ticket: impl Into<String>) -> Self {
        Self(ticket.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServiceTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServiceTicket(***)")
    }
}

/// Acquires and refreshes UMLS tickets.
pub struct TicketManager {
    http: reqwest::Client,
    auth_url: String,
    api_key: String,
    service: String,
    ttl: Duration,
    tgt: RwLock<Option<TicketGrantingTicket>>,
}

impl TicketManager {
    pub fn new(http: reqwest::Client, config: &UmlsConfig) -> Self {
        Self {
            http,
            auth_url: config.auth_url.clone(),
            api_key: config.api_key.clone(),
            service: config.service.clone(),
            ttl: config.tgt_ttl(),
            tgt: RwLock::new(None),
        }
    }

    /// Returns the cached TGT, acquiring a new one when none is cached or
    /// the cached one has outlived the TTL.
    pub async fn ticket_granting_ticket(&self) -> Result<TicketGrantingTicket> {
        {
            let cached = self.tgt.read().await;
            if let Some(tgt) = cached.as_ref() {
                if !tgt.is_expired(self.ttl) {
                    return Ok(tgt.clone());
                }
                tracing::debug!(age_secs = tgt.age().as_secs(), "UMLS TGT expired");
            }
        }

        let mut cached = self.tgt.write().await;
        // Another request may have refreshed the TGT while we waited for the lock.
        if let Some(tgt) = cached.as_ref() {
            if !tgt.is_expired(self.ttl) {
                return Ok(tgt.clone());
            }
        }

        let tgt = self.request_tgt().await?;
        *cached = Some(tgt.clone());
        Ok(tgt)
    }

    /// Exchanges the API key for a new TGT. Only `201 Created` is accepted.
    pub async fn request_tgt(&self) -> Result<TicketGrantingTicket> {
        tracing::debug!(auth_url = %self.auth_url, "Requesting UMLS ticket-granting ticket");

        let response = self
            .http
            .post(&self.auth_url)
            .form(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "UMLS TGT request failed");
                UmlsError::Network(e)
            })?;

        let status = response.status();
        if status != StatusCode::CREATED {
            tracing::warn!(status = status.as_u16(), "UMLS rejected TGT request");
            return Err(UmlsError::TgtRequestFailed {
                status: status.as_u16(),
            });
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(UmlsError::MissingTgtLocation)?;

        tracing::info!("Obtained UMLS ticket-granting ticket");
        Ok(TicketGrantingTicket::new(location))
    }

    /// Requests a single-use service ticket from `tgt`. Only `200 OK` is accepted.
    pub async fn request_service_ticket(&self, tgt: &TicketGrantingTicket) -> Result<ServiceTicket> {
        let response = self
            .http
            .post(tgt.url())
            .form(&[("service", self.service.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "UMLS rejected service ticket request");
            return Err(UmlsError::ServiceTicketFailed {
                status: status.as_u16(),
            });
        }

        let ticket = response.text().await?.trim().to_string();
        if ticket.is_empty() {
            return Err(UmlsError::EmptyServiceTicket);
        }

        tracing::debug!("Issued UMLS service ticket");
        Ok(ServiceTicket::new(ticket))
    }

    /// Drops the cached TGT so the next request re-authenticates.
    pub async fn invalidate(&self) {
        let mut cached = self.tgt.write().await;
        if cached.take().is_some() {
            tracing::debug!("Invalidated cached UMLS TGT");
        }
    }

    /// Drops the cached TGT only if it is `failed`; a TGT refreshed by a
    /// concurrent caller is kept.
    pub async fn invalidate_tgt(&self, failed: &TicketGrantingTicket) {
        let mut cached = self.tgt.write().await;
        if cached.as_ref().is_some_and(|tgt| tgt.url() == failed.url()) {
            *cached = None;
            tracing::debug!("Invalidated cached UMLS TGT");
        }
    }

    /// Returns `true` if a TGT is cached and still within its TTL.
    pub async fn has_valid_tgt(&self) -> bool {
        self.tgt
            .read()
            .await
            .as_ref()
            .is_some_and(|tgt| !tgt.is_expired(self.ttl))
    }
}

#[async_trait]
impl TicketSource for TicketManager {
    async fn service_ticket(&self) -> Result<ServiceTicket> {
        let tgt = self.ticket_granting_ticket().await?;
        match self.request_service_ticket(&tgt).await {
            Ok(ticket) => Ok(ticket),
            Err(e) => {
                self.invalidate_tgt(&tgt).await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(ttl: Duration) -> TicketManager {
        let config = UmlsConfig::default()
            .with_api_key("test-key")
            .with_tgt_ttl(ttl);
        TicketManager::new(reqwest::Client::new(), &config)
    }

    #[test]
    fn test_tgt_expiry() {
        let tgt = TicketGrantingTicket::new("https://utslogin.example/TGT-1");
        assert!(!tgt.is_expired(Duration::from_secs(60)));
        assert!(tgt.is_expired(Duration::ZERO));
        assert_eq!(tgt.url(), "https://utslogin.example/TGT-1");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let tgt = TicketGrantingTicket::new("https://utslogin.example/TGT-secret");
        assert!(!format!("{tgt:?}").contains("TGT-secret"));

        let ticket = ServiceTicket::new("ST-secret");
        assert_eq!(format!("{ticket:?}"), "ServiceTicket(***)");
        assert_eq!(ticket.as_str(), "ST-secret");
    }

    #[tokio::test]
    async fn test_cached_tgt_is_reused_within_ttl() {
        let manager = manager(Duration::from_secs(3600));
        *manager.tgt.write().await = Some(TicketGrantingTicket::new("http://cas/TGT-1"));

        assert!(manager.has_valid_tgt().await);
        let tgt = manager.ticket_granting_ticket().await.unwrap();
        assert_eq!(tgt.url(), "http://cas/TGT-1");
    }

    #[tokio::test]
    async fn test_invalidate_clears_cache() {
        let manager = manager(Duration::from_secs(3600));
        *manager.tgt.write().await = Some(TicketGrantingTicket::new("http://cas/TGT-1"));

        manager.invalidate().await;
        assert!(!manager.has_valid_tgt().await);
    }

    #[tokio::test]
    async fn test_invalidate_tgt_keeps_newer_ticket() {
        let manager = manager(Duration::from_secs(3600));
        let stale = TicketGrantingTicket::new("http://cas/TGT-1");
        *manager.tgt.write().await = Some(TicketGrantingTicket::new("http://cas/TGT-2"));

        manager.invalidate_tgt(&stale).await;
        let tgt = manager.ticket_granting_ticket().await.unwrap();
        assert_eq!(tgt.url(), "http://cas/TGT-2");

        manager.invalidate_tgt(&tgt).await;
        assert!(!manager.has_valid_tgt().await);
    }

    #[tokio::test]
    async fn test_expired_tgt_is_not_valid() {
        let manager = manager(Duration::ZERO);
        *manager.tgt.write().await = Some(TicketGrantingTicket::new("http://cas/TGT-1"));
        assert!(!manager.has_valid_tgt().await);
    }
}
