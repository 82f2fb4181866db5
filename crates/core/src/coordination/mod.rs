// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable mutual exclusion and resource pools
//!
//! This module provides:
//! - **WaiterQueue** - FIFO of pending acquire requests
//! - **PermitLedger** - Active leases against a fixed capacity
//! - **Coordinator** - The per-resource state machine driving both
//! - **Query** - Read-only status and waiter introspection

pub mod coordinator;
pub mod ledger;
pub mod query;
pub mod queue;
pub mod signal;

/// Milliseconds since the Unix epoch, as recorded by the host
pub type Millis = u64;

pub use coordinator::{Coordinator, Phase, RETIRED_TOKEN_WINDOW};
pub use ledger::{Capacity, Lease, PermitLedger};
pub use query::{Query, QueryKind, QueryResponse, StatusReport, WaiterState};
pub use queue::{WaiterEntry, WaiterQueue};
pub use signal::{Input, Signal, SignalName};
