// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Read-only git queries against one working copy

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::command::{CommandRunner, ProcessRunner};
use crate::commit::{CommitRecord, DATE_FORMAT, LOG_FORMAT, parse_log_line};
use crate::error::GitError;

/// Remote queried when none is configured
pub const DEFAULT_REMOTE: &str = "origin";

/// A git client bound to one working-copy directory
#[derive(Clone)]
pub struct GitClient {
    dir: PathBuf,
    remote: String,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for GitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitClient")
            .field("dir", &self.dir)
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}

impl GitClient {
    /// Client that runs the `git` executable in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_runner(dir, Arc::new(ProcessRunner::git()))
    }

    /// Client that sends its commands through `runner`
    pub fn with_runner(dir: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            dir: dir.into(),
            remote: DEFAULT_REMOTE.to_string(),
            runner,
        }
    }

    /// Query `remote` instead of [`DEFAULT_REMOTE`]
    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// The working-copy directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The remote name
    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Raw `git log` line for exactly one revision
    ///
    /// # Errors
    ///
    /// Returns `GitError::Command` if the revision cannot be resolved.
    pub async fn log_line(
        &self,
        revision: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GitError> {
        let pretty = format!("--pretty=format:{LOG_FORMAT}");
        let date = format!("--date=format-local:{DATE_FORMAT}");
        self.git(&["log", pretty.as_str(), date.as_str(), "-1", revision], cancel)
            .await
    }

    /// The commit a revision resolves to
    ///
    /// # Errors
    ///
    /// Returns `GitError::Command` if the revision cannot be resolved and
    /// `GitError::Parse` if the output does not match the log format.
    pub async fn commit(
        &self,
        revision: &str,
        cancel: &CancellationToken,
    ) -> Result<CommitRecord, GitError> {
        let line = self.log_line(revision, cancel).await?;
        parse_log_line(&line)
    }

    /// Nearest tag reachable from a revision
    ///
    /// # Errors
    ///
    /// Returns `GitError::NoTag` if no tag is reachable, or
    /// `GitError::Cancelled` if cancellation fired.
    pub async fn latest_tag(
        &self,
        revision: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GitError> {
        let no_tag = || GitError::NoTag {
            revision: revision.to_string(),
        };
        match self
            .git(&["describe", "--abbrev=0", "--tags", revision], cancel)
            .await
        {
            Ok(name) if name.is_empty() => Err(no_tag()),
            Ok(name) => Ok(name),
            Err(GitError::Cancelled) => Err(GitError::Cancelled),
            Err(e) => {
                debug!(dir = %self.dir.display(), revision, error = %e, "no tag");
                Err(no_tag())
            }
        }
    }

    /// URL configured for the remote
    ///
    /// # Errors
    ///
    /// Returns `GitError::Command` or `GitError::MissingRemote` if no URL is set.
    pub async fn remote_url(&self, cancel: &CancellationToken) -> Result<String, GitError> {
        let key = format!("remote.{}.url", self.remote);
        let url = self.git(&["config", "--get", key.as_str()], cancel).await?;
        if url.is_empty() {
            return Err(GitError::MissingRemote {
                remote: self.remote.clone(),
            });
        }
        Ok(url)
    }

    /// Update the remote-tracking refs
    ///
    /// # Errors
    ///
    /// Returns `GitError::Command` on network or authentication failure.
    pub async fn fetch(&self, cancel: &CancellationToken) -> Result<(), GitError> {
        self.git(&["fetch", self.remote.as_str()], cancel).await?;
        Ok(())
    }

    /// Hash of the remote's default branch tip
    ///
    /// # Errors
    ///
    /// Returns `GitError::Command` if the remote is unreachable and
    /// `GitError::InvalidOutput` if the advertisement cannot be parsed.
    pub async fn remote_head_hash(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GitError> {
        let output = self.git(&["ls-remote", url, "HEAD"], cancel).await?;
        parse_ls_remote(&output)
    }

    async fn git(&self, args: &[&str], cancel: &CancellationToken) -> Result<String, GitError> {
        self.runner.run(&self.dir, args, cancel).await
    }
}

/// Extract the hash from the first `<hash>\t<ref>` line of `git ls-remote`
///
/// # Errors
///
/// Returns `GitError::InvalidOutput` if there is no such line.
pub fn parse_ls_remote(output: &str) -> Result<String, GitError> {
    let invalid = || GitError::InvalidOutput {
        what: "ls-remote",
        output: output.to_string(),
    };
    let first = output.lines().next().ok_or_else(invalid)?;
    match first.split_once('\t') {
        Some((hash, _)) if !hash.trim().is_empty() => Ok(hash.trim().to_string()),
        _ => Err(invalid()),
    }
}
