// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! End-to-end workflow tests for grinfo
//!
//! These tests run the real `git` executable against throwaway repositories,
//! first through the library pipeline and then through the binary itself.


use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;

use grinfo::report::Report;
use grinfo::worker::WorkerPool;
use grinfo_git::ProcessRunner;
use test_utils::{TestRemote, run_git};
use tokio_util::sync::CancellationToken;

fn pool() -> WorkerPool {
    WorkerPool::new(2, 4, Arc::new(ProcessRunner::git()))
}

fn path_string(path: &std::path::Path) -> String {
    path.to_str().expect("utf-8 path").to_string()
}

// ============================================================================
// Library pipeline
// ============================================================================

#[tokio::test]
async fn e2e_behind_remote() {
    let mut remote = TestRemote::new();
    let work = remote.clone_work();
    let initial = run_git(&work, &["rev-parse", "HEAD"], test_utils::FIRST_DATE);
    let pushed = remote.advance("remote work");

    let items = pool()
        .run_paths(vec![path_string(&work)], CancellationToken::new())
        .await;
    assert_eq!(items.len(), 1);
    let report = items[0].report().expect("report");

    assert_eq!(report.dir, path_string(&work));
    assert_eq!(report.url, path_string(remote.url()));
    assert_eq!(report.local.hash, initial);
    assert_eq!(report.local.message, "initial commit");
    assert_eq!(report.remote.hash, pushed);
    assert_eq!(report.remote.parent, vec![initial]);
    assert_eq!(report.remote.message, "remote work");
    assert_eq!(report.remote.author.date, "2024-01-04 00:03:00");

    let diff = &report.remote.time_diff_from_local;
    assert_eq!(diff.second, 3 * 86_400 + 180);
    assert_eq!(diff.day, 3);
    assert_eq!(diff.string, "72h3m0s");
    assert!(report.is_diverged());
    assert!(report.local_tag.is_none());
    assert!(report.remote_tag.is_none());
}

#[tokio::test]
async fn e2e_up_to_date_with_tags() {
    let mut remote = TestRemote::new();
    let work = remote.clone_work();
    run_git(&work, &["tag", "v0.1.0"], test_utils::FIRST_DATE);
    remote.advance("after tag");

    let items = pool()
        .run_paths(vec![path_string(&work)], CancellationToken::new())
        .await;
    let report = items[0].report().expect("report");

    let local_tag = report.local_tag.as_ref().expect("local tag");
    assert_eq!(local_tag.tag.as_deref(), Some("v0.1.0"));
    assert_eq!(local_tag.hash, report.local.hash);
    assert_eq!(local_tag.time_diff_from_local.second, 0);

    // The fetched remote commit descends from the tagged one
    let remote_tag = report.remote_tag.as_ref().expect("remote tag");
    assert_eq!(remote_tag.tag.as_deref(), Some("v0.1.0"));
    assert_eq!(remote_tag.hash, report.local.hash);
}

#[tokio::test]
async fn e2e_mixed_batch() {
    let mut remote = TestRemote::new();
    let first = remote.clone_work();
    let second = remote.clone_work();
    let plain = remote.plain_dir();

    let input = vec![
        path_string(&first),
        path_string(&plain),
        path_string(&second),
    ];
    let items = pool().run_paths(input, CancellationToken::new()).await;
    assert_eq!(items.len(), 3);

    let failed: Vec<_> = items.iter().filter(|item| !item.is_ok()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].dir, path_string(&plain));

    for item in items.iter().filter(|item| item.is_ok()) {
        let report = item.report().expect("report");
        assert!(!report.is_diverged(), "fresh clones match their remote");
        assert_eq!(report.remote.time_diff_from_local.second, 0);
    }
}

// ============================================================================
// Binary
// ============================================================================

#[test]
fn e2e_binary_streams_json_lines() {
    let mut remote = TestRemote::new();
    let work = remote.clone_work();
    let plain = remote.plain_dir();
    remote.advance("remote work");

    let mut child = Command::new(env!("CARGO_BIN_EXE_grinfo"))
        .args(["--worker", "2", "--buffer", "1"])
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start grinfo");

    {
        let mut stdin = child.stdin.take().expect("stdin");
        writeln!(stdin, "{}", path_string(&work)).expect("write path");
        writeln!(stdin).expect("write blank line");
        writeln!(stdin, "{}", path_string(&plain)).expect("write path");
    }

    let output = child.wait_with_output().expect("grinfo should finish");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf-8 stdout");
    let reports: Vec<Report> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is one report"))
        .collect();
    assert_eq!(reports.len(), 1, "only successful reports are written");
    assert_eq!(reports[0].dir, path_string(&work));
    assert!(reports[0].is_diverged());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(&path_string(&plain)),
        "failure should be logged: {stderr}"
    );
}

#[test]
fn e2e_binary_empty_input() {
    let output = Command::new(env!("CARGO_BIN_EXE_grinfo"))
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run grinfo");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
