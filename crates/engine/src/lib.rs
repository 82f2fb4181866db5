// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Turnstile coordination runtime

mod client;
mod clock;
mod config;
mod error;
mod initializer;
mod instance;
mod router;
mod runtime;
mod scheduler;

pub use client::{AcquireOptions, LeaseHandle, RequesterClient};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use error::RuntimeError;
pub use initializer::{ConfigInitializer, FixedCapacity, FnInitializer, PoolInitializer};
pub use router::{Grant, GrantRouter};
pub use runtime::{Runtime, RuntimeConfig, RuntimeDeps};
pub use scheduler::Scheduler;
