// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Command execution seam
//!
//! Every git query goes through a [`CommandRunner`]. [`ProcessRunner`] spawns
//! real processes and kills them when the cancellation token fires.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::GitError;

/// Runs one external command inside a working directory
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command with `args` in `dir` and return its trimmed stdout
    ///
    /// # Errors
    ///
    /// Returns `GitError::Cancelled` if `cancel` fires before the command
    /// exits, and `GitError::Command` or `GitError::Spawn` if it fails.
    async fn run(
        &self,
        dir: &Path,
        args: &[&str],
        cancel: &CancellationToken,
    ) -> Result<String, GitError>;
}

/// Runs commands as child processes via `tokio::process`
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
    envs: Vec<(String, String)>,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::git()
    }
}

impl ProcessRunner {
    /// Runner for an arbitrary program
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            envs: Vec::new(),
        }
    }

    /// Runner for `git`
    ///
    /// Credential prompts are disabled so a fetch can never wait on a
    /// terminal, and `TZ` is pinned so local-format dates are printed in UTC.
    #[must_use]
    pub fn git() -> Self {
        Self::new("git")
            .with_env("GIT_TERMINAL_PROMPT", "0")
            .with_env("TZ", "UTC")
    }

    /// Add an environment variable for every spawned process
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// The program this runner spawns
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut command = self.program.display().to_string();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        dir: &Path,
        args: &[&str],
        cancel: &CancellationToken,
    ) -> Result<String, GitError> {
        if cancel.is_cancelled() {
            return Err(GitError::Cancelled);
        }

        let command = self.describe(args);
        trace!(dir = %dir.display(), %command, "spawn");

        let child = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GitError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // Dropping the output future drops the child, which kills it.
        let output = tokio::select! {
            output = child.wait_with_output() => output.map_err(|source| GitError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?,
            () = cancel.cancelled() => {
                trace!(dir = %dir.display(), %command, "killed on cancellation");
                return Err(GitError::Cancelled);
            }
        };

        if !output.status.success() {
            return Err(GitError::Command {
                command,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
