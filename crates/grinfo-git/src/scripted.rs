// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! In-process command runner for tests
//!
//! Available with the `test-util` feature.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::command::CommandRunner;
use crate::error::GitError;

/// Canned reply of a [`ScriptedRunner`] rule
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Succeed with this stdout
    Output(String),
    /// Fail as a non-zero exit with this stderr
    Failure(String),
    /// Block until cancelled, then return `GitError::Cancelled`
    Hang,
}

#[derive(Debug, Clone)]
struct Rule {
    dir: Option<PathBuf>,
    args: Vec<String>,
    reply: Scripted,
}

impl Rule {
    fn matches(&self, dir: &Path, args: &[&str]) -> bool {
        self.dir.as_deref().is_none_or(|d| d == dir)
            && self.args.iter().all(|want| args.contains(&want.as_str()))
    }
}

/// A recorded [`ScriptedRunner`] invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Directory the command ran in
    pub dir: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
}

/// In-process runner that replies from a rule table
///
/// A rule matches when its directory (if any) equals the working directory
/// and every one of its arguments appears in the invocation. Rules are tried
/// in insertion order; an invocation no rule matches fails.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedRunner {
    /// Create a runner with no rules
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to matching invocations in any directory
    pub fn respond(&self, args: &[&str], reply: Scripted) -> &Self {
        self.push(None, args, reply)
    }

    /// Reply to matching invocations in `dir` only
    pub fn respond_in(&self, dir: impl AsRef<Path>, args: &[&str], reply: Scripted) -> &Self {
        self.push(Some(dir.as_ref().to_path_buf()), args, reply)
    }

    /// All invocations so far
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push(&self, dir: Option<PathBuf>, args: &[&str], reply: Scripted) -> &Self {
        if let Ok(mut rules) = self.rules.lock() {
            rules.push(Rule {
                dir,
                args: args.iter().map(|a| (*a).to_string()).collect(),
                reply,
            });
        }
        self
    }

    fn lookup(&self, dir: &Path, args: &[&str]) -> Option<Scripted> {
        let rules = self.rules.lock().ok()?;
        rules
            .iter()
            .find(|rule| rule.matches(dir, args))
            .map(|rule| rule.reply.clone())
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        dir: &Path,
        args: &[&str],
        cancel: &CancellationToken,
    ) -> Result<String, GitError> {
        if cancel.is_cancelled() {
            return Err(GitError::Cancelled);
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Call {
                dir: dir.to_path_buf(),
                args: args.iter().map(|a| (*a).to_string()).collect(),
            });
        }

        let command = format!("git {}", args.join(" "));
        match self.lookup(dir, args) {
            Some(Scripted::Output(stdout)) => Ok(stdout),
            Some(Scripted::Failure(stderr)) => Err(GitError::Command {
                command,
                status: Some(1),
                stderr,
            }),
            Some(Scripted::Hang) => {
                cancel.cancelled().await;
                Err(GitError::Cancelled)
            }
            None => Err(GitError::Command {
                command,
                status: None,
                stderr: "no scripted reply".to_string(),
            }),
        }
    }
}
