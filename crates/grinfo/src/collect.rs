// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Per-repository collection pipeline
//!
//! The steps run strictly in order: remote URL, local HEAD, local tag, fetch,
//! remote HEAD hash, remote HEAD commit, remote tag. Tags are best-effort;
//! every other step is mandatory and its error fails the repository.

use grinfo_git::{CommitRecord, GitClient, GitError, TagRecord};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::report::{Report, RepositoryState};

/// Gathers a [`Report`] for one working copy
#[derive(Debug, Clone)]
pub struct Collector {
    git: GitClient,
}

impl Collector {
    /// Collect through `git`
    #[must_use]
    pub fn new(git: GitClient) -> Self {
        Self { git }
    }

    /// Run every query and build the report
    ///
    /// # Errors
    ///
    /// Returns the first mandatory step's error, or `GitError::Cancelled`.
    pub async fn collect(&self, cancel: &CancellationToken) -> Result<Report, GitError> {
        let state = self.state(cancel).await?;
        Ok(Report::build(self.git.dir().display().to_string(), &state))
    }

    /// Run every query and return the raw records
    ///
    /// # Errors
    ///
    /// Returns the first mandatory step's error, or `GitError::Cancelled`.
    pub async fn state(&self, cancel: &CancellationToken) -> Result<RepositoryState, GitError> {
        let dir = self.git.dir().display().to_string();

        let url = self.git.remote_url(cancel).await?;
        debug!(%dir, %url, "remote url");

        let local = self.git.commit("HEAD", cancel).await?;
        debug!(%dir, hash = %local.hash, "local head");

        let local_tag = self.tag(&local, cancel).await?;

        self.git.fetch(cancel).await?;
        debug!(%dir, "fetched");

        let remote_hash = self.git.remote_head_hash(&url, cancel).await?;
        let remote = self.git.commit(&remote_hash, cancel).await?;
        debug!(%dir, hash = %remote.hash, "remote head");

        let remote_tag = self.tag(&remote, cancel).await?;

        Ok(RepositoryState {
            url,
            local,
            local_tag,
            remote,
            remote_tag,
        })
    }

    /// Latest tag reachable from `commit`, `None` if there is none
    async fn tag(
        &self,
        commit: &CommitRecord,
        cancel: &CancellationToken,
    ) -> Result<Option<TagRecord>, GitError> {
        let name = match self.git.latest_tag(&commit.hash, cancel).await {
            Ok(name) => name,
            Err(e) if e.is_no_tag() => return Ok(None),
            Err(e) => return Err(e),
        };
        let tagged = self.git.commit(&name, cancel).await?;
        debug!(dir = %self.git.dir().display(), tag = %name, hash = %tagged.hash, "tag");
        Ok(Some(TagRecord {
            name,
            commit: tagged,
        }))
    }
}
