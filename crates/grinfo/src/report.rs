// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report types and the pure functions that derive them
//!
//! A [`Report`] compares the local HEAD of a working copy with the tip of
//! its remote. Every element carries a [`TimeDiff`] measured from the local
//! commit's author time, so a positive value means "newer than local".

use chrono::{DateTime, Utc};
use grinfo_git::commit::DATE_FORMAT;
use grinfo_git::{CommitRecord, Identity, TagRecord};
use serde::{Deserialize, Serialize};

/// Signed distance between two author times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDiff {
    /// Human-readable duration such as `72h3m0s`
    pub string: String,
    /// Total seconds
    pub second: i64,
    /// Whole hours divided by 24, truncated toward zero
    pub day: i64,
}

impl TimeDiff {
    /// `this - local`
    #[must_use]
    pub fn between(this: DateTime<Utc>, local: DateTime<Utc>) -> Self {
        Self::from_seconds((this - local).num_seconds())
    }

    /// Build from a signed number of seconds
    #[must_use]
    pub fn from_seconds(second: i64) -> Self {
        Self {
            string: format_duration(second),
            second,
            day: second / 3600 / 24,
        }
    }
}

/// Render seconds as hours, minutes and seconds, e.g. `-1h30m0s`
///
/// Leading zero units are omitted, so 90 seconds is `1m30s` and zero is `0s`.
#[must_use]
pub fn format_duration(seconds: i64) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    let (h, m, s) = (total / 3600, total % 3600 / 60, total % 60);
    if h > 0 {
        format!("{sign}{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{sign}{m}m{s}s")
    } else {
        format!("{sign}{s}s")
    }
}

/// Author or committer as it appears in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Relative date as printed by git
    pub reldate: String,
    /// Absolute date, `YYYY-MM-DD HH:MM:SS`
    pub date: String,
    /// Unix timestamp in seconds
    pub timestamp: i64,
}

impl From<&Identity> for Member {
    fn from(identity: &Identity) -> Self {
        Self {
            name: identity.name.clone(),
            email: identity.email.clone(),
            reldate: identity.relative_date.clone(),
            date: identity.date.format(DATE_FORMAT).to_string(),
            timestamp: identity.date.timestamp(),
        }
    }
}

/// One commit in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportElement {
    /// Commit SHA
    pub hash: String,
    /// Tree SHA
    pub tree: String,
    /// Parent SHAs
    pub parent: Vec<String>,
    /// Subject line
    pub message: String,
    /// Author
    pub author: Member,
    /// Committer
    pub committer: Member,
    /// Author time relative to the local commit's author time
    pub time_diff_from_local: TimeDiff,
    /// Tag resolving to this commit, for tag elements only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ReportElement {
    /// Describe `commit` relative to `local`
    #[must_use]
    pub fn new(commit: &CommitRecord, local: &CommitRecord) -> Self {
        Self {
            hash: commit.hash.clone(),
            tree: commit.tree.clone(),
            parent: commit.parents.clone(),
            message: commit.message.clone(),
            author: Member::from(&commit.author),
            committer: Member::from(&commit.committer),
            time_diff_from_local: TimeDiff::between(commit.author.date, local.author.date),
            tag: None,
        }
    }

    /// Describe a tagged commit relative to `local`
    #[must_use]
    pub fn from_tag(tag: &TagRecord, local: &CommitRecord) -> Self {
        Self {
            tag: Some(tag.name.clone()),
            ..Self::new(&tag.commit, local)
        }
    }
}

/// Everything gathered from one working copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryState {
    /// Remote URL
    pub url: String,
    /// Local HEAD commit
    pub local: CommitRecord,
    /// Nearest tag reachable from local HEAD
    pub local_tag: Option<TagRecord>,
    /// Remote HEAD commit, after fetching
    pub remote: CommitRecord,
    /// Nearest tag reachable from remote HEAD
    pub remote_tag: Option<TagRecord>,
}

/// The final per-repository report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Remote URL
    pub url: String,
    /// Working-copy directory as given on input
    pub dir: String,
    /// Local HEAD
    pub local: ReportElement,
    /// Remote HEAD
    pub remote: ReportElement,
    /// Latest local tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_tag: Option<ReportElement>,
    /// Latest remote tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_tag: Option<ReportElement>,
}

impl Report {
    /// Assemble the report for `dir`
    #[must_use]
    pub fn build(dir: impl Into<String>, state: &RepositoryState) -> Self {
        let local = &state.local;
        Self {
            url: state.url.clone(),
            dir: dir.into(),
            local: ReportElement::new(local, local),
            remote: ReportElement::new(&state.remote, local),
            local_tag: state
                .local_tag
                .as_ref()
                .map(|tag| ReportElement::from_tag(tag, local)),
            remote_tag: state
                .remote_tag
                .as_ref()
                .map(|tag| ReportElement::from_tag(tag, local)),
        }
    }

    /// Whether the remote HEAD differs from the local HEAD
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        self.local.hash != self.remote.hash
    }
}
