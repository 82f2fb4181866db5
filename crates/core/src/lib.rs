// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ts-core: pure state machines for the turnstile resource coordinator
//!
//! This crate provides:
//! - Identifiers and token generation
//! - The waiter queue and permit ledger for one resource
//! - The coordinator state machine (signals in, effects out)
//! - Read-only status and waiter queries
//!
//! Nothing here performs I/O or reads a clock. Time enters only as the
//! timestamp recorded alongside each input, which keeps replay deterministic.

pub mod coordination;
pub mod effect;
pub mod error;
pub mod id;
pub mod traced;

pub use coordination::{
    Capacity, Coordinator, Input, Lease, Millis, Phase, PermitLedger, Query, QueryKind,
    QueryResponse, Signal, SignalName, StatusReport, WaiterEntry, WaiterQueue, WaiterState,
};
pub use effect::{Effect, Event};
pub use error::CoordinationError;
pub use id::{RequesterId, ResourceId, SequentialTokenGen, Token, TokenGen, UuidTokenGen};
pub use traced::TracedEffect;
