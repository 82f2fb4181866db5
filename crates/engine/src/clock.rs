// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock abstraction for recording history timestamps

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use ts_core::Millis;

/// A clock that stamps inputs with epoch milliseconds
pub trait Clock: Clone + Send + Sync + 'static {
    fn now_ms(&self) -> Millis;
}

/// Real clock, anchored to the tokio timer so paused-time tests stay consistent
#[derive(Clone)]
pub struct SystemClock {
    origin_ms: Millis,
    origin: tokio::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let origin_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Millis)
            .unwrap_or(0);
        Self {
            origin_ms,
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin_ms
            .saturating_add(self.origin.elapsed().as_millis() as Millis)
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<Millis>>,
}

impl FakeClock {
    pub fn new(start_ms: Millis) -> Self {
        Self {
            current: Arc::new(Mutex::new(start_ms)),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = current.saturating_add(duration.as_millis() as Millis);
    }

    pub fn set(&self, ms: Millis) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = ms;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> Millis {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
