//! Client for the VSAC FHIR terminology API.
//!
//! VSAC authenticates with HTTP basic auth: the user name is the literal
//! `apikey` and the password is the UMLS account API key.

pub mod client;
pub mod config;
pub mod error;

pub use client::VsacClient;
pub use config::VsacConfig;
pub use error::VsacError;

pub type Result<T> = std::result::Result<T, VsacError>;
