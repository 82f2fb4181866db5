// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log holding one coordinator's history

use crate::history::{HistoryEntry, HistoryRecord};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use ts_core::Millis;

/// Errors that can occur in history operations
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt history {path} at line {line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
    #[error("history for {0} does not begin with a start record")]
    MissingStart(String),
}

/// Append-only JSON-lines log, one record per line
pub struct Wal {
    file: File,
    sequence: u64,
    /// File length covered by complete, synced records
    committed: u64,
}

impl Wal {
    /// Open or create a log at the given path
    ///
    /// A torn final line left by a crash mid-append is truncated away.
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        truncate_torn_tail(path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let sequence = Self::replay(path)?.last().map_or(0, |r| r.seq);
        let committed = file.metadata()?.len();

        Ok(Self {
            file,
            sequence,
            committed,
        })
    }

    /// Append an entry, returning the sequenced record
    ///
    /// A failed append leaves no bytes behind: the file is cut back to the
    /// last complete record before returning the error, and again before the
    /// next write if that cut failed too.
    pub fn append(&mut self, at: Millis, entry: HistoryEntry) -> Result<HistoryRecord, HistoryError> {
        let record = HistoryRecord {
            seq: self.sequence + 1,
            at,
            entry,
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        if let Err(e) = self.write_line(line.as_bytes()) {
            let _ = self.file.set_len(self.committed);
            return Err(e.into());
        }
        self.committed += line.len() as u64;
        self.sequence = record.seq;
        Ok(record)
    }

    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        if self.file.metadata()?.len() != self.committed {
            self.file.set_len(self.committed)?;
        }
        self.file.write_all(line)?;
        self.file.sync_all()
    }

    /// Get the current sequence number
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Read every complete record from `path`
    ///
    /// A missing file is an empty history. A final line without a trailing
    /// newline is a torn write and is skipped.
    pub fn replay(path: &Path) -> Result<Vec<HistoryRecord>, HistoryError> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let complete = contents.rfind('\n').map_or("", |i| &contents[..=i]);

        let mut records = Vec::new();
        for (index, line) in complete.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let record: HistoryRecord =
                serde_json::from_str(line).map_err(|source| HistoryError::Corrupt {
                    path: path.to_path_buf(),
                    line: index + 1,
                    source,
                })?;
            records.push(record);
        }

        Ok(records)
    }
}

fn truncate_torn_tail(path: &Path) -> Result<(), HistoryError> {
    let contents = match fs::read(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    if contents.is_empty() || contents.ends_with(b"\n") {
        return Ok(());
    }
    let keep = contents
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |i| i + 1);
    let file = OpenOptions::new().write(true).open(path)?;
    file.set_len(keep as u64)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
