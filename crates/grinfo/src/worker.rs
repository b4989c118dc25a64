// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Bounded worker pool
//!
//! A fixed number of tokio tasks share one input receiver and one bounded
//! output sender. Each worker claims the next path, runs the [`Collector`]
//! for it and enqueues the outcome. The output stream closes when the last
//! worker drops its sender, which happens once input is exhausted or the
//! cancellation token fires.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use grinfo::worker::WorkerPool;
//! use grinfo_git::ProcessRunner;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() {
//! let pool = WorkerPool::new(4, 100, Arc::new(ProcessRunner::git()));
//! let items = pool
//!     .run_paths(vec!["/src/a".to_string(), "/src/b".to_string()], CancellationToken::new())
//!     .await;
//! for item in items {
//!     println!("{}: ok={}", item.dir, item.is_ok());
//! }
//! # }
//! ```

use std::sync::Arc;

use grinfo_git::{CommandRunner, DEFAULT_REMOTE, GitClient, GitError};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::collect::Collector;
use crate::report::Report;

/// Number of workers when none is configured
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Output buffer capacity when none is configured
pub const DEFAULT_BUFFER_SIZE: usize = 100;

/// One input path and what became of it
#[derive(Debug)]
pub struct WorkItem {
    /// The path as read from input
    pub dir: String,
    /// The report, or why it could not be built
    pub outcome: Result<Report, GitError>,
}

impl WorkItem {
    /// Whether a report was produced
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The report, if any
    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        self.outcome.as_ref().ok()
    }
}

/// Fans input paths out to a fixed set of workers
#[derive(Clone)]
pub struct WorkerPool {
    worker_count: usize,
    buffer_size: usize,
    remote: String,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("worker_count", &self.worker_count)
            .field("buffer_size", &self.buffer_size)
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}

impl WorkerPool {
    /// Create a pool; counts below 1 are raised to 1
    pub fn new(worker_count: usize, buffer_size: usize, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            worker_count: worker_count.max(1),
            buffer_size: buffer_size.max(1),
            remote: DEFAULT_REMOTE.to_string(),
            runner,
        }
    }

    /// Query `remote` in every repository
    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Number of concurrent workers
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Output buffer capacity
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Start the workers and return the result stream
    ///
    /// Must be called from within a tokio runtime. The returned receiver
    /// yields one [`WorkItem`] per path that was fully processed and then
    /// closes. Paths abandoned because of cancellation yield nothing.
    pub fn start(
        &self,
        input: mpsc::Receiver<String>,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<WorkItem> {
        let (output, results) = mpsc::channel(self.buffer_size);
        let input = Arc::new(Mutex::new(input));

        let mut workers = JoinSet::new();
        for id in 0..self.worker_count {
            let worker = Worker {
                id,
                input: Arc::clone(&input),
                output: output.clone(),
                cancel: cancel.clone(),
                remote: self.remote.clone(),
                runner: Arc::clone(&self.runner),
            };
            workers.spawn(worker.run());
        }
        // Only the workers hold senders now, so the stream closes with them.
        drop(output);

        tokio::spawn(async move {
            let mut processed = 0;
            while let Some(joined) = workers.join_next().await {
                match joined {
                    Ok(count) => processed += count,
                    Err(e) => error!(error = %e, "worker task failed"),
                }
            }
            debug!(processed, "worker pool drained");
        });

        results
    }

    /// Process `paths` and gather every outcome
    ///
    /// Paths are fed through a channel of the pool's buffer size, so the
    /// same backpressure applies as with [`WorkerPool::start`].
    pub async fn run_paths<I>(&self, paths: I, cancel: CancellationToken) -> Vec<WorkItem>
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: Send + 'static,
    {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let feeder_cancel = cancel.clone();
        let paths = paths.into_iter();
        tokio::spawn(async move {
            for path in paths {
                tokio::select! {
                    sent = tx.send(path) => if sent.is_err() { break },
                    () = feeder_cancel.cancelled() => break,
                }
            }
        });

        let mut results = self.start(rx, cancel);
        let mut items = Vec::new();
        while let Some(item) = results.recv().await {
            items.push(item);
        }
        items
    }
}

struct Worker {
    id: usize,
    input: Arc<Mutex<mpsc::Receiver<String>>>,
    output: mpsc::Sender<WorkItem>,
    cancel: CancellationToken,
    remote: String,
    runner: Arc<dyn CommandRunner>,
}

impl Worker {
    async fn run(self) -> usize {
        let mut processed = 0;
        while let Some(dir) = self.claim().await {
            debug!(worker = self.id, %dir, "start process");

            let git = GitClient::with_runner(&dir, Arc::clone(&self.runner))
                .with_remote(self.remote.as_str());
            let outcome = Collector::new(git).collect(&self.cancel).await;
            if matches!(&outcome, Err(e) if e.is_cancelled()) {
                debug!(worker = self.id, %dir, "cancel process");
                break;
            }
            debug!(worker = self.id, %dir, ok = outcome.is_ok(), "end process");

            // A finished outcome is kept whenever the buffer has room
            let item = WorkItem { dir, outcome };
            tokio::select! {
                biased;
                sent = self.output.send(item) => {
                    if sent.is_err() {
                        debug!(worker = self.id, "result receiver dropped");
                        break;
                    }
                }
                () = self.cancel.cancelled() => break,
            }
            processed += 1;
        }
        debug!(worker = self.id, processed, "worker done");
        processed
    }

    /// Next unclaimed path, or `None` once input is exhausted or cancelled
    async fn claim(&self) -> Option<String> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let mut input = tokio::select! {
            guard = self.input.lock() => guard,
            () = self.cancel.cancelled() => return None,
        };
        tokio::select! {
            dir = input.recv() => dir,
            () = self.cancel.cancelled() => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grinfo_git::{Scripted, ScriptedRunner};
    use std::path::Path;

    #[test]
    fn test_counts_are_clamped() {
        let runner = Arc::new(ScriptedRunner::new());
        let pool = WorkerPool::new(0, 0, runner);
        assert_eq!(pool.worker_count(), 1);
        assert_eq!(pool.buffer_size(), 1);
    }

    #[test]
    fn test_counts_are_kept() {
        let runner = Arc::new(ScriptedRunner::new());
        let pool = WorkerPool::new(DEFAULT_WORKER_COUNT, DEFAULT_BUFFER_SIZE, runner);
        assert_eq!(pool.worker_count(), 4);
        assert_eq!(pool.buffer_size(), 100);
    }

    #[tokio::test]
    async fn test_empty_input_closes_output() {
        let runner = Arc::new(ScriptedRunner::new());
        let pool = WorkerPool::new(3, 2, runner);
        let items = pool.run_paths(Vec::new(), CancellationToken::new()).await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_start_emits_nothing() {
        let runner = Arc::new(ScriptedRunner::new());
        let pool = WorkerPool::new(2, 2, runner.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let items = pool
            .run_paths(vec!["/a".to_string(), "/b".to_string()], cancel)
            .await;
        assert!(items.is_empty());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_emitted_per_item() {
        // No rules at all: every repository fails at its first query
        let runner = Arc::new(ScriptedRunner::new());
        let pool = WorkerPool::new(2, 1, runner);
        let paths: Vec<String> = (0..5).map(|i| format!("/repo/{i}")).collect();

        let items = pool.run_paths(paths.clone(), CancellationToken::new()).await;
        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|item| !item.is_ok()));

        let mut dirs: Vec<String> = items.into_iter().map(|item| item.dir).collect();
        dirs.sort();
        assert_eq!(dirs, paths);
    }

    /// Cancels the run right after answering the remote tag lookup
    struct CancelAfterLastStep {
        inner: ScriptedRunner,
        cancel: CancellationToken,
    }

    #[async_trait::async_trait]
    impl CommandRunner for CancelAfterLastStep {
        async fn run(
            &self,
            dir: &Path,
            args: &[&str],
            cancel: &CancellationToken,
        ) -> Result<String, GitError> {
            let reply = self.inner.run(dir, args, cancel).await;
            if args.contains(&REMOTE) && args[0] == "describe" {
                self.cancel.cancel();
            }
            reply
        }
    }

    const LOCAL: &str = "1111111111111111111111111111111111111111";
    const REMOTE: &str = "2222222222222222222222222222222222222222";

    fn line(hash: &str) -> String {
        format!(
            "{hash}|{}||Ann|ann@example.com|2026-01-01 00:00:00|x ago|Ann|ann@example.com|2026-01-01 00:00:00|x ago|msg",
            "f".repeat(40)
        )
    }

    fn healthy_repository() -> ScriptedRunner {
        let runner = ScriptedRunner::new();
        runner
            .respond(&["config"], Scripted::Output("https://example.com/r.git".to_string()))
            .respond(&["log", "HEAD"], Scripted::Output(line(LOCAL)))
            .respond(&["fetch"], Scripted::Output(String::new()))
            .respond(&["ls-remote"], Scripted::Output(format!("{REMOTE}\tHEAD")))
            .respond(&["log", REMOTE], Scripted::Output(line(REMOTE)))
            .respond(&["describe"], Scripted::Failure("No names found".to_string()));
        runner
    }

    #[tokio::test]
    async fn test_outcome_finished_before_cancel_is_kept() {
        // Repeated so an unordered race between send and cancel would show up
        for _ in 0..32 {
            let cancel = CancellationToken::new();
            let runner = Arc::new(CancelAfterLastStep {
                inner: healthy_repository(),
                cancel: cancel.clone(),
            });
            let pool = WorkerPool::new(1, 1, runner);

            let items = pool.run_paths(vec!["/work/r".to_string()], cancel.clone()).await;
            assert!(cancel.is_cancelled());
            assert_eq!(items.len(), 1, "finished report must not be dropped");
            assert!(items[0].is_ok());
        }
    }
}
