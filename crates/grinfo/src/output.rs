// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! JSON-lines report output

use std::io::Write;

use thiserror::Error;

use crate::report::Report;

/// Errors writing a report
#[derive(Debug, Error)]
pub enum OutputError {
    /// The report could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The writer failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OutputError {
    /// Whether the reader on the other end has gone away
    #[must_use]
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}

/// Write `report` as one line of JSON
///
/// # Errors
///
/// Returns `OutputError` if serialization or the write fails.
pub fn write_report<W: Write>(writer: &mut W, report: &Report) -> Result<(), OutputError> {
    let mut line = serde_json::to_vec(report)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    writer.flush()?;
    Ok(())
}
