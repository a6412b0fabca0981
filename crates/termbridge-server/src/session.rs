//! Per-session "last generated file".
//!
//! A browser session is identified by a UUID cookie. Each session owns one
//! generated spreadsheet at a time under `export.output_dir/<session>/`;
//! generating a new one removes the previous file. Sessions older than the
//! TTL, and the oldest ones beyond the entry cap, are evicted together with
//! their directory whenever a new file is written.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use dashmap::DashMap;
use termbridge_export::{ExportFormat, ExportRecord, ExportWriter};
use uuid::Uuid;

use crate::error::Result;

pub const SESSION_COOKIE_NAME: &str = "termbridge_session";

/// Path every generated file is downloaded from.
pub const DOWNLOAD_PATH: &str = "/retrieve/download";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    /// Name offered to the browser
    pub file_name: String,
    pub format: ExportFormat,
    pub created_at: Instant,
}

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Debug, Clone)]
pub struct SessionStore {
    output_dir: PathBuf,
    ttl: Duration,
    max_sessions: usize,
    files: Arc<DashMap<Uuid, GeneratedFile>>,
}

impl SessionStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ttl: DEFAULT_SESSION_TTL,
            max_sessions: DEFAULT_MAX_SESSIONS,
            files: Arc::new(DashMap::new()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// At least one session (the writer's own) is always kept.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub fn get(&self, session: &Uuid) -> Option<GeneratedFile> {
        self.files.get(session).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Writes `rows` as the session's new file and forgets the previous one.
    pub async fn write_export<R>(
        &self,
        session: Uuid,
        file_name: String,
        format: ExportFormat,
        rows: Vec<R>,
    ) -> Result<GeneratedFile>
    where
        R: ExportRecord + Send + 'static,
    {
        self.evict(session).await;

        let path = self.output_dir.join(session.to_string()).join(&file_name);
        let target = path.clone();
        tokio::task::spawn_blocking(move || ExportWriter::new(format).write(&target, &rows))
            .await??;

        let file = GeneratedFile {
            path,
            file_name,
            format,
            created_at: Instant::now(),
        };
        self.replace(session, file.clone()).await;
        Ok(file)
    }

    /// Removes expired sessions and, oldest first, those beyond the entry cap.
    /// `keep` is the session about to write and is never evicted.
    async fn evict(&self, keep: Uuid) {
        let mut others: Vec<(Uuid, Instant)> = self
            .files
            .iter()
            .filter(|entry| *entry.key() != keep)
            .map(|entry| (*entry.key(), entry.value().created_at))
            .collect();
        others.sort_by_key(|(_, created_at)| *created_at);

        let over_cap = others.len().saturating_sub(self.max_sessions - 1);
        let evicted: Vec<Uuid> = others
            .iter()
            .enumerate()
            .filter(|(i, (_, created_at))| *i < over_cap || created_at.elapsed() >= self.ttl)
            .map(|(_, (id, _))| *id)
            .collect();

        for id in &evicted {
            if self.files.remove(id).is_none() {
                continue;
            }
            let dir = self.output_dir.join(id.to_string());
            match tokio::fs::remove_dir_all(&dir).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    path = %dir.display(),
                    error = %e,
                    "Failed to remove evicted session directory"
                ),
            }
        }
        if !evicted.is_empty() {
            tracing::debug!(evicted = evicted.len(), remaining = self.files.len(), "Evicted sessions");
        }
    }

    async fn replace(&self, session: Uuid, file: GeneratedFile) {
        let new_path = file.path.clone();
        let previous = self.files.insert(session, file);
        if let Some(previous) = previous.filter(|p| p.path != new_path) {
            if let Err(e) = tokio::fs::remove_file(&previous.path).await {
                tracing::warn!(
                    path = %previous.path.display(),
                    error = %e,
                    "Failed to remove previous export"
                );
            }
        }
    }
}

/// Session id from the request cookie, if it carries a valid one.
pub fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE_NAME)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// Returns the request's session id, issuing a new cookie when it has none.
pub fn ensure_session(jar: CookieJar) -> (CookieJar, Uuid) {
    if let Some(id) = session_id(&jar) {
        return (jar, id);
    }
    let id = Uuid::new_v4();
    tracing::debug!(session = %id, "Starting new session");
    (jar.add(session_cookie(id)), id)
}

fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, id.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}
