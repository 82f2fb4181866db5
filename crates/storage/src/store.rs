// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! History stores: one ordered log per resource

use crate::history::{HistoryEntry, HistoryRecord};
use crate::wal::{HistoryError, Wal};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use ts_core::{Millis, ResourceId};

const EXTENSION: &str = "jsonl";

/// Durable, totally ordered history per resource
pub trait HistoryStore: Send + Sync + 'static {
    /// Append an entry to a resource's history
    fn append(
        &self,
        resource: &ResourceId,
        at: Millis,
        entry: HistoryEntry,
    ) -> Result<HistoryRecord, HistoryError>;

    /// Load a resource's full history; empty when it never started
    fn load(&self, resource: &ResourceId) -> Result<Vec<HistoryRecord>, HistoryError>;

    /// Resources with any recorded history
    fn resources(&self) -> Result<Vec<ResourceId>, HistoryError>;
}

/// History kept in memory; lost with the process
#[derive(Default)]
pub struct MemoryHistory {
    records: Mutex<HashMap<ResourceId, Vec<HistoryRecord>>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistory {
    fn append(
        &self,
        resource: &ResourceId,
        at: Millis,
        entry: HistoryEntry,
    ) -> Result<HistoryRecord, HistoryError> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let log = records.entry(resource.clone()).or_default();
        let record = HistoryRecord {
            seq: log.last().map_or(0, |r| r.seq) + 1,
            at,
            entry,
        };
        log.push(record.clone());
        Ok(record)
    }

    fn load(&self, resource: &ResourceId) -> Result<Vec<HistoryRecord>, HistoryError> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(resource).cloned().unwrap_or_default())
    }

    fn resources(&self) -> Result<Vec<ResourceId>, HistoryError> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let mut resources: Vec<_> = records.keys().cloned().collect();
        resources.sort();
        Ok(resources)
    }
}

/// History persisted as one JSON-lines file per resource under a directory
pub struct FileHistory {
    dir: PathBuf,
    logs: Mutex<HashMap<ResourceId, Wal>>,
}

impl FileHistory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            logs: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the log file for a resource
    pub fn path_for(&self, resource: &ResourceId) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_name(resource.as_str()), EXTENSION))
    }
}

impl HistoryStore for FileHistory {
    fn append(
        &self,
        resource: &ResourceId,
        at: Millis,
        entry: HistoryEntry,
    ) -> Result<HistoryRecord, HistoryError> {
        let mut logs = self.logs.lock().unwrap_or_else(|e| e.into_inner());
        let wal = match logs.entry(resource.clone()) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(Wal::open(&self.path_for(resource))?)
            }
        };
        wal.append(at, entry)
    }

    fn load(&self, resource: &ResourceId) -> Result<Vec<HistoryRecord>, HistoryError> {
        Wal::replay(&self.path_for(resource))
    }

    fn resources(&self) -> Result<Vec<ResourceId>, HistoryError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut resources = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()).and_then(decode_name) {
                resources.push(ResourceId::new(name));
            }
        }
        resources.sort();
        Ok(resources)
    }
}

/// Escape a resource id into a portable file name
fn encode_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn decode_name(encoded: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(encoded.len());
    let mut iter = encoded.bytes();
    while let Some(byte) = iter.next() {
        if byte == b'%' {
            let hi = iter.next()?;
            let lo = iter.next()?;
            let hex = [hi, lo];
            let hex = std::str::from_utf8(&hex).ok()?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
        } else {
            bytes.push(byte);
        }
    }
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
