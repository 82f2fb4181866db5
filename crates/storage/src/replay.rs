// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rebuild a coordinator from its recorded history

use crate::history::{HistoryEntry, HistoryRecord};
use crate::wal::HistoryError;
use ts_core::{Coordinator, Effect, Input, Millis, ResourceId};

/// A coordinator rebuilt from history
#[derive(Debug)]
pub struct Rebuilt {
    pub coordinator: Coordinator,
    /// Effects produced while replaying, in order
    pub effects: Vec<Effect>,
    /// Sequence number of the last applied record
    pub last_seq: u64,
}

/// Replay a resource's records against a fresh coordinator
///
/// The first record must be `Started`; later `Started` records are ignored.
pub fn rebuild(resource: &ResourceId, records: &[HistoryRecord]) -> Result<Rebuilt, HistoryError> {
    let Some((first, rest)) = records.split_first() else {
        return Err(HistoryError::MissingStart(resource.to_string()));
    };
    let HistoryEntry::Started { capacity } = &first.entry else {
        return Err(HistoryError::MissingStart(resource.to_string()));
    };

    let inputs: Vec<(Input, Millis)> = rest
        .iter()
        .filter_map(|r| r.entry.input().map(|input| (input, r.at)))
        .collect();
    let (coordinator, effects) = Coordinator::replay(
        resource.clone(),
        *capacity,
        inputs.iter().map(|(input, at)| (input, *at)),
    );

    Ok(Rebuilt {
        coordinator,
        effects,
        last_seq: records.last().map_or(0, |r| r.seq),
    })
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
