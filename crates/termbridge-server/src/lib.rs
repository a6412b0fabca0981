pub mod config;
pub mod error;
pub mod git_sync;
pub mod handlers;
pub mod observability;
pub mod server;
pub mod session;
pub mod snomed;
pub mod value_sets;

pub use config::{AppConfig, ExportConfig, GitSyncConfig, LoggingConfig, ServerConfig};
pub use error::AppError;
pub use observability::init_tracing;
pub use server::{AppState, ServerBuilder, TermbridgeServer, build_app, router};
