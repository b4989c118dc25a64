// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit records and the fixed-format `git log` line parser
//!
//! Commits are requested with [`LOG_FORMAT`], a pipe-delimited layout of
//! twelve fields:
//!
//! ```text
//! hash|tree|parents|author name|author email|author date|author reldate|
//! committer name|committer email|committer date|committer reldate|subject
//! ```
//!
//! Dates use [`DATE_FORMAT`] and are interpreted as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GitError;

/// `git log --pretty=format:` placeholders for one commit line
///
/// See <https://git-scm.com/docs/git-log#_pretty_formats>.
pub const LOG_FORMAT: &str = "%H|%T|%P|%an|%ae|%ad|%ar|%cn|%ce|%cd|%cr|%s";

/// Absolute date layout used for author and committer dates
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of fields in a commit line
pub const FIELD_COUNT: usize = 12;

const SEPARATOR: char = '|';

/// Author or committer of a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Absolute timestamp
    pub date: DateTime<Utc>,
    /// Relative date as printed by git, e.g. "3 days ago"
    pub relative_date: String,
}

/// Represents one parsed commit line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The commit SHA
    pub hash: String,
    /// The tree SHA
    pub tree: String,
    /// Parent commit SHAs, empty for a root commit
    pub parents: Vec<String>,
    /// Who authored the change
    pub author: Identity,
    /// Who created the commit object
    pub committer: Identity,
    /// Subject line
    pub message: String,
}

impl CommitRecord {
    /// Validate that a SHA is a valid 40-character hex string
    #[must_use]
    pub fn is_valid_sha(sha: &str) -> bool {
        sha.len() == 40 && sha.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the short SHA (first 7 characters)
    #[must_use]
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }

    /// Check if this is a merge commit (has multiple parents)
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Check if this is a root commit (has no parents)
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// A commit together with the tag that resolves to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Tag name
    pub name: String,
    /// The tagged commit
    pub commit: CommitRecord,
}

/// Parse one line of `git log --pretty=format:LOG_FORMAT` output
///
/// The line is split into at most [`FIELD_COUNT`] fields, so the trailing
/// subject may itself contain `|`.
///
/// # Errors
///
/// Returns `GitError::Parse` if the line has fewer than twelve fields or if
/// either date does not match [`DATE_FORMAT`].
pub fn parse_log_line(line: &str) -> Result<CommitRecord, GitError> {
    let body = line.trim_end_matches(['\r', '\n']);
    let body = body
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(body);

    let fields: Vec<&str> = body.splitn(FIELD_COUNT, SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(parse_error(
            line,
            format!("want {FIELD_COUNT} fields but got {}", fields.len()),
        ));
    }

    let author = parse_identity(fields[3], fields[4], fields[5], fields[6])
        .map_err(|reason| parse_error(line, reason))?;
    let committer = parse_identity(fields[7], fields[8], fields[9], fields[10])
        .map_err(|reason| parse_error(line, reason))?;

    Ok(CommitRecord {
        hash: fields[0].to_string(),
        tree: fields[1].to_string(),
        parents: parse_parents(fields[2]),
        author,
        committer,
        message: fields[11].to_string(),
    })
}

/// Render a record in the layout accepted by [`parse_log_line`]
#[must_use]
pub fn format_log_line(record: &CommitRecord) -> String {
    let identity = |i: &Identity| {
        format!(
            "{}|{}|{}|{}",
            i.name,
            i.email,
            i.date.format(DATE_FORMAT),
            i.relative_date
        )
    };
    format!(
        "{}|{}|{}|{}|{}|{}",
        record.hash,
        record.tree,
        record.parents.join(" "),
        identity(&record.author),
        identity(&record.committer),
        record.message
    )
}

/// Parse a date printed with [`DATE_FORMAT`] as a UTC timestamp
///
/// # Errors
///
/// Returns a description of the mismatch if the text is not a valid date.
pub fn parse_date(text: &str) -> Result<DateTime<Utc>, String> {
    let text = text.trim_matches('\'');
    NaiveDateTime::parse_from_str(text, DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid date {text:?}: {e}"))
}

fn parse_identity(
    name: &str,
    email: &str,
    date: &str,
    relative_date: &str,
) -> Result<Identity, String> {
    Ok(Identity {
        name: name.to_string(),
        email: email.to_string(),
        date: parse_date(date)?,
        relative_date: relative_date.to_string(),
    })
}

fn parse_parents(text: &str) -> Vec<String> {
    // A root commit prints an empty parent field
    if text.is_empty() {
        return Vec::new();
    }
    text.split(' ')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_error(line: &str, reason: String) -> GitError {
    GitError::Parse {
        reason,
        line: line.to_string(),
    }
}
