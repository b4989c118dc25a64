// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! grinfo-git: git queries and commit parsing for grinfo
//!
//! This library crate runs a fixed set of read-only `git` queries against a
//! working copy and parses their output into typed records. Every query takes
//! a cancellation token; a cancelled query kills its child process.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use grinfo_git::GitClient;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), grinfo_git::GitError> {
//! let cancel = CancellationToken::new();
//! let git = GitClient::new("/path/to/repo");
//! let head = git.commit("HEAD", &cancel).await?;
//! println!("{} - {}", head.short_hash(), head.message);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod command;
pub mod commit;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

pub use client::{DEFAULT_REMOTE, GitClient};
pub use command::{CommandRunner, ProcessRunner};
pub use commit::{CommitRecord, Identity, TagRecord, format_log_line, parse_log_line};
pub use error::GitError;
#[cfg(any(test, feature = "test-util"))]
pub use scripted::{Call, Scripted, ScriptedRunner};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::client::GitClient;
    pub use crate::command::{CommandRunner, ProcessRunner};
    pub use crate::commit::{CommitRecord, Identity, TagRecord};
    pub use crate::error::GitError;
}
