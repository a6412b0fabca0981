//! `git add`, `commit`, `push` of the configured repository.

use std::path::{Path, PathBuf};
use std::process::Output;

use axum::Json;
use axum::extract::State;
use termbridge_api::MessageResponse;
use tokio::process::Command;

use crate::config::GitSyncConfig;
use crate::error::Result;
use crate::server::AppState;

#[derive(Debug, thiserror::Error)]
pub enum GitSyncError {
    #[error("Git sync is disabled")]
    Disabled,

    #[error("Git repository not found: {0}")]
    RepoNotFound(PathBuf),

    #[error("Failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("`git {command}` failed with exit code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

#[derive(Debug, Clone)]
pub struct GitSync {
    repo_path: PathBuf,
    remote: String,
    branch: String,
    commit_message: String,
}

impl GitSync {
    /// `None` when git sync is disabled or has no repository configured.
    pub fn from_config(config: &GitSyncConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        Some(Self {
            repo_path: config.repo_path.clone()?,
            remote: config.remote.clone(),
            branch: config.branch.clone(),
            commit_message: config.commit_message.clone(),
        })
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Stages everything, commits and pushes. A clean tree still pushes.
    pub async fn sync(&self) -> std::result::Result<(), GitSyncError> {
        if !self.repo_path.join(".git").exists() {
            return Err(GitSyncError::RepoNotFound(self.repo_path.clone()));
        }

        self.run(&["add", "."]).await?;

        let commit = self.git(&["commit", "-m", &self.commit_message]).await?;
        if !commit.status.success() {
            if is_nothing_to_commit(&commit) {
                tracing::info!(repo = %self.repo_path.display(), "Nothing to commit");
            } else {
                return Err(command_failed("commit", &commit));
            }
        }

        self.run(&["push", &self.remote, &self.branch]).await?;
        tracing::info!(
            repo = %self.repo_path.display(),
            remote = %self.remote,
            branch = %self.branch,
            "Git sync completed"
        );
        Ok(())
    }

    async fn run(&self, args: &[&str]) -> std::result::Result<Output, GitSyncError> {
        let output = self.git(args).await?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(command_failed(args.first().copied().unwrap_or_default(), &output))
        }
    }

    async fn git(&self, args: &[&str]) -> std::result::Result<Output, GitSyncError> {
        tracing::debug!(repo = %self.repo_path.display(), ?args, "Running git");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_path)
            .args(args)
            .output()
            .await?;
        Ok(output)
    }
}

fn is_nothing_to_commit(output: &Output) -> bool {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    stdout.contains("nothing to commit") || stderr.contains("nothing to commit")
}

fn command_failed(command: &str, output: &Output) -> GitSyncError {
    GitSyncError::CommandFailed {
        command: command.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// `POST /sync-git`
pub async fn sync_git(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    let git = state.git_sync.as_ref().ok_or(GitSyncError::Disabled)?;
    git.sync().await.inspect_err(|e| {
        tracing::error!(error = %e, "Git sync failed");
    })?;
    Ok(Json(MessageResponse::new("Git sync completed successfully")))
}
