// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! grinfo: compare git working copies with their remotes
//!
//! This module exports the pipeline behind the `grinfo` binary for use in
//! integration tests and as a library. Paths flow from [`input`] through the
//! [`worker`] pool, where [`collect`] queries each repository, and the
//! resulting [`report::Report`] values are written by [`output`].

pub mod collect;
pub mod config;
pub mod input;
pub mod output;
pub mod report;
pub mod worker;

pub use collect::Collector;
pub use config::Config;
pub use output::{OutputError, write_report};
pub use report::{Member, Report, ReportElement, RepositoryState, TimeDiff};
pub use worker::{WorkItem, WorkerPool};
