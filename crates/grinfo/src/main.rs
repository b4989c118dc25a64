// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! grinfo: report the latest local and remote commits of git working copies
//!
//! Reads repository paths from stdin and writes one JSON line per repository
//! to stdout. Logs go to stderr so they never mix with the reports.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use grinfo::config::Config;
use grinfo::input::spawn_line_reader;
use grinfo::output::write_report;
use grinfo::worker::WorkerPool;
use grinfo_git::ProcessRunner;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    debug!(
        worker = config.worker_count(),
        buffer = config.buffer_size(),
        remote = %config.remote,
        "starting grinfo"
    );

    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    let result = runtime.block_on(run(config));
    // A read on stdin may still be blocked; do not wait for it
    runtime.shutdown_background();
    result
}

async fn run(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupted, shutting down");
                interrupt.cancel();
            }
            Err(e) => error!(error = %e, "failed to listen for interrupt"),
        }
    });

    let (paths, reader) =
        spawn_line_reader(tokio::io::stdin(), config.buffer_size(), cancel.clone());
    let pool = WorkerPool::new(
        config.worker_count(),
        config.buffer_size(),
        Arc::new(ProcessRunner::git()),
    )
    .with_remote(config.remote.as_str());
    let mut results = pool.start(paths, cancel.clone());

    let mut stdout = std::io::stdout().lock();
    let (mut written, mut failed) = (0usize, 0usize);
    while let Some(item) = results.recv().await {
        match item.outcome {
            Ok(report) => {
                if let Err(e) = write_report(&mut stdout, &report) {
                    if e.is_broken_pipe() {
                        debug!("stdout closed");
                    } else {
                        error!(error = %e, "failed to write report");
                    }
                    cancel.cancel();
                    break;
                }
                written += 1;
            }
            Err(e) => {
                failed += 1;
                warn!(dir = %item.dir, error = %e, "failed to collect repository");
            }
        }
    }
    // Unblock the workers if output stopped early
    drop(results);

    match reader.await.context("input reader task failed")? {
        Ok(read) => debug!(read, "input done"),
        Err(e) => error!(error = %e, "failed to read input"),
    }
    debug!(written, failed, "done");
    Ok(())
}
