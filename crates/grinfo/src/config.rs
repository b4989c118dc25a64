// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the grinfo command
//!
//! Repository paths are read from stdin, one per line. Everything else comes
//! from flags or their environment variables.

use clap::Parser;

use crate::worker::{DEFAULT_BUFFER_SIZE, DEFAULT_WORKER_COUNT};

/// Report the latest local and remote commits of git working copies
///
/// Reads one repository path per line from stdin and writes one JSON report
/// per repository to stdout. Failures are logged to stderr.
#[derive(Parser, Debug, Clone)]
#[command(name = "grinfo")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Number of repositories processed concurrently
    ///
    /// Values below 1 are treated as 1.
    #[arg(
        short,
        long,
        env = "GRINFO_WORKER",
        default_value_t = 4,
        allow_negative_numbers = true
    )]
    pub worker: i64,

    /// Capacity of the input and output buffers
    ///
    /// Values below 1 are treated as 1.
    #[arg(
        short,
        long,
        env = "GRINFO_BUFFER",
        default_value_t = 100,
        allow_negative_numbers = true
    )]
    pub buffer: i64,

    /// Name of the remote to compare against
    #[arg(short, long, env = "GRINFO_REMOTE", default_value = "origin")]
    pub remote: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker: DEFAULT_WORKER_COUNT as i64,
            buffer: DEFAULT_BUFFER_SIZE as i64,
            remote: grinfo_git::DEFAULT_REMOTE.to_string(),
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Worker count, at least 1
    #[must_use]
    pub fn worker_count(&self) -> usize {
        clamp_count(self.worker)
    }

    /// Buffer capacity, at least 1
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        clamp_count(self.buffer)
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

fn clamp_count(value: i64) -> usize {
    usize::try_from(value.max(1)).unwrap_or(usize::MAX)
}
