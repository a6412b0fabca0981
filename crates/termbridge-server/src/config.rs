use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use termbridge_export::ExportFormat;
use termbridge_umls::UmlsConfig;
use termbridge_vsac::VsacConfig;

use crate::session::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// UMLS ticket and REST settings; `umls.api_key` also authenticates VSAC
    #[serde(default)]
    pub umls: UmlsConfig,
    #[serde(default)]
    pub vsac: VsacConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub git_sync: GitSyncConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        self.umls.validate()?;
        self.vsac.validate()?;
        if self.export.output_dir.as_os_str().is_empty() {
            return Err("export.output_dir must not be empty".into());
        }
        if self.export.session_ttl_secs == 0 {
            return Err("export.session_ttl_secs must be > 0".into());
        }
        if self.export.max_sessions == 0 {
            return Err("export.max_sessions must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        if self.git_sync.enabled && self.git_sync.repo_path.is_none() {
            return Err("git_sync.enabled=true requires git_sync.repo_path".into());
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// Where generated spreadsheets are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Each session gets its own subdirectory.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub format: ExportFormat,
    /// Sessions idle longer than this lose their file
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl ExportConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}
fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL.as_secs()
}
fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: ExportFormat::default(),
            session_ttl_secs: default_session_ttl_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

/// `POST /sync-git` settings. Disabled unless explicitly enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitSyncConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub repo_path: Option<PathBuf>,
    #[serde(default = "default_remote")]
    pub remote: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

fn default_remote() -> String {
    "origin".into()
}
fn default_branch() -> String {
    "main".into()
}
fn default_commit_message() -> String {
    "Auto-sync from web button".into()
}

impl Default for GitSyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            repo_path: None,
            remote: default_remote(),
            branch: default_branch(),
            commit_message: default_commit_message(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_FILE: &str = "termbridge.toml";

    /// Environment variable accepted when `umls.api_key` is not configured.
    pub const API_KEY_ENV: &str = "UMLS_API_KEY";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., TERMBRIDGE__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("TERMBRIDGE")
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let mut merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;

        if merged.umls.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                merged.umls.api_key = key.trim().to_string();
            }
        }

        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.umls.api_key = "k".into();
        cfg
    }

    #[test]
    fn test_defaults_need_only_an_api_key() {
        assert!(AppConfig::default().validate().is_err());
        assert!(valid().validate().is_ok());
        assert_eq!(valid().addr().port(), 8080);
    }

    #[test]
    fn test_git_sync_requires_repo_path() {
        let mut cfg = valid();
        cfg.git_sync.enabled = true;
        assert!(cfg.validate().unwrap_err().contains("repo_path"));
        cfg.git_sync.repo_path = Some(PathBuf::from("/srv/vsac"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_session_limits_must_be_positive() {
        let mut cfg = valid();
        cfg.export.session_ttl_secs = 0;
        assert!(cfg.validate().unwrap_err().contains("session_ttl_secs"));

        let mut cfg = valid();
        cfg.export.max_sessions = 0;
        assert!(cfg.validate().unwrap_err().contains("max_sessions"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut cfg = valid();
        cfg.logging.level = "verbose".into();
        assert!(cfg.validate().unwrap_err().contains("logging.level"));
    }
}
