// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable signal history for turnstile coordinators

mod history;
mod replay;
mod store;
mod wal;

pub use history::{HistoryEntry, HistoryRecord};
pub use replay::{rebuild, Rebuilt};
pub use store::{FileHistory, HistoryStore, MemoryHistory};
pub use wal::{HistoryError, Wal};
