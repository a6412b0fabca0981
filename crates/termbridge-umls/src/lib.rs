//! UMLS Terminology Services client.
//!
//! The UTS REST API authenticates every call with a single-use *service
//! ticket*. Service tickets are minted from a *ticket-granting ticket* (TGT),
//! which in turn is obtained by posting the account API key to the CAS
//! endpoint. This crate provides:
//!
//! - [`TicketManager`] - acquires the TGT, caches it for its validity window
//!   and mints one service ticket per request
//! - [`UmlsClient::search_terms`] - word search restricted to one source
//!   vocabulary (SNOMED CT by default)
//! - [`UmlsClient::map_concept`] - resolves a CUI to ICD-10-CM codes,
//!   paginating the atoms endpoint and expanding range codes
//!
//! # Example
//!
//! ```ignore
//! use termbridge_umls::{UmlsClient, UmlsConfig};
//!
//! let client = UmlsClient::new(UmlsConfig::default().with_api_key(key))?;
//! let hits = client.search_terms("asthma").await?;
//! let mappings = client.map_concepts(hits).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod mapping;
pub mod search;
pub mod ticket;

pub use client::UmlsClient;
pub use config::UmlsConfig;
pub use error::UmlsError;
pub use mapping::code_from_uri;
pub use ticket::{ServiceTicket, TicketGrantingTicket, TicketManager, TicketSource};

/// Convenience result type for UMLS operations
pub type Result<T> = std::result::Result<T, UmlsError>;
