// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Records making up one coordinator's history

use serde::{Deserialize, Serialize};
use ts_core::{Capacity, Input, Millis, Signal};

/// What happened at one step of a coordinator's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryEntry {
    /// Coordinator created; always the first record
    Started { capacity: Capacity },
    /// A signal was applied
    Signal(Signal),
    /// A durable timer fired
    TimerFired { id: String },
}

impl HistoryEntry {
    /// The coordinator input this entry replays as, if any
    pub fn input(&self) -> Option<Input> {
        match self {
            HistoryEntry::Started { .. } => None,
            HistoryEntry::Signal(signal) => Some(Input::Signal(signal.clone())),
            HistoryEntry::TimerFired { id } => Some(Input::TimerFired { id: id.clone() }),
        }
    }
}

impl From<Input> for HistoryEntry {
    fn from(input: Input) -> Self {
        match input {
            Input::Signal(signal) => HistoryEntry::Signal(signal),
            Input::TimerFired { id } => HistoryEntry::TimerFired { id },
        }
    }
}

/// A sequenced, timestamped history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub seq: u64,
    /// Timestamp recorded by the host when the entry was applied
    pub at: Millis,
    pub entry: HistoryEntry,
}
