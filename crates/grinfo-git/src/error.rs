// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for grinfo-git

use thiserror::Error;

/// Errors that can occur during git operations
#[derive(Debug, Error)]
pub enum GitError {
    /// The git process could not be started
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        /// The program that was executed
        program: String,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The git process exited unsuccessfully
    #[error("Git command failed ({command}, exit {status:?}): {stderr}")]
    Command {
        /// The command line that was executed
        command: String,
        /// Exit code, if the process was not killed by a signal
        status: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The git process succeeded but printed something we cannot interpret
    #[error("Invalid {what} output: {output}")]
    InvalidOutput {
        /// Which query produced the output
        what: &'static str,
        /// The raw output
        output: String,
    },

    /// A commit line did not match the fixed log format
    #[error("Invalid git log line ({reason}): {line}")]
    Parse {
        /// Why the line was rejected
        reason: String,
        /// The raw line, kept for diagnostics
        line: String,
    },

    /// No remote URL is configured for the working copy
    #[error("No URL configured for remote {remote}")]
    MissingRemote {
        /// Name of the remote that was looked up
        remote: String,
    },

    /// No tag is reachable from the revision
    #[error("No tag reachable from {revision}")]
    NoTag {
        /// The revision that was described
        revision: String,
    },

    /// The shared cancellation token fired while the operation was running
    #[error("Operation cancelled")]
    Cancelled,
}

impl GitError {
    /// Whether this error was caused by cancellation rather than by git
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether this error only means that no tag could be resolved
    #[must_use]
    pub fn is_no_tag(&self) -> bool {
        matches!(self, Self::NoTag { .. })
    }
}
