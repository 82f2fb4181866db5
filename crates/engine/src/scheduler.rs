// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable-timer bookkeeping for a single coordinator

use std::collections::BTreeMap;
use ts_core::Millis;

/// Pending timers keyed by id
///
/// Setting an id that already exists replaces its deadline.
#[derive(Debug, Default)]
pub struct Scheduler {
    timers: BTreeMap<String, Millis>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_timer(&mut self, id: impl Into<String>, fire_at: Millis) {
        self.timers.insert(id.into(), fire_at);
    }

    pub fn cancel_timer(&mut self, id: &str) {
        self.timers.remove(id);
    }

    /// Remove and return every timer due at `now`, earliest first
    pub fn fired_timers(&mut self, now: Millis) -> Vec<String> {
        let mut due: Vec<(Millis, String)> = self
            .timers
            .iter()
            .filter(|(_, fire_at)| **fire_at <= now)
            .map(|(id, &fire_at)| (fire_at, id.clone()))
            .collect();
        due.sort();
        for (_, id) in &due {
            self.timers.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.values().min().copied()
    }

    pub fn has_timers(&self) -> bool {
        !self.timers.is_empty()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
