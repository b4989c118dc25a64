// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Newline-delimited path input

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Stream lines of `reader` into a bounded channel
///
/// Lines are trimmed and blank lines are skipped. A line that is not valid
/// UTF-8 is logged and skipped without ending the stream. The task ends at
/// EOF, on cancellation, on a read error, or when the receiver is dropped,
/// and resolves to the number of paths forwarded.
pub fn spawn_line_reader<R>(
    reader: R,
    capacity: usize,
    cancel: CancellationToken,
) -> (mpsc::Receiver<String>, JoinHandle<std::io::Result<usize>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let handle = tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut forwarded = 0;
        loop {
            buf.clear();
            let read = tokio::select! {
                read = reader.read_until(b'\n', &mut buf) => read?,
                () = cancel.cancelled() => break,
            };
            if read == 0 {
                break;
            }
            let path = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim().to_string(),
                Err(_) => {
                    let lossy = String::from_utf8_lossy(&buf);
                    warn!(path = %lossy.trim(), "skipping path that is not valid UTF-8");
                    continue;
                }
            };
            if path.is_empty() {
                continue;
            }
            tokio::select! {
                sent = tx.send(path) => {
                    if sent.is_err() {
                        debug!("input receiver dropped");
                        break;
                    }
                }
                () = cancel.cancelled() => break,
            }
            forwarded += 1;
        }
        debug!(forwarded, "input closed");
        Ok::<usize, std::io::Error>(forwarded)
    });
    (rx, handle)
}
