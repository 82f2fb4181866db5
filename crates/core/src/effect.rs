// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects and events produced by the coordinator

use crate::coordination::Millis;
use crate::id::{RequesterId, ResourceId, Token};
use serde::{Deserialize, Serialize};

/// Effects are side effects the coordinator asks its host to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Tell a waiting requester its acquire was granted
    Grant {
        resource: ResourceId,
        requester: RequesterId,
        token: Token,
    },
    /// Arm a durable timer
    SetTimer { id: String, fire_at: Millis },
    /// Disarm a durable timer
    CancelTimer { id: String },
    /// Emit an event for observability
    Emit(Event),
}

/// Observable outcomes of coordinator transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Acquire could not be granted yet
    Queued {
        resource: ResourceId,
        requester: RequesterId,
        token: Token,
        position: usize,
    },
    Granted {
        resource: ResourceId,
        holder: RequesterId,
        token: Token,
        available: u32,
    },
    Released {
        resource: ResourceId,
        holder: RequesterId,
        token: Token,
        available: u32,
    },
    /// Waiter gave up before being granted
    Cancelled {
        resource: ResourceId,
        requester: RequesterId,
        token: Token,
    },
    /// Lease force-released after its deadline passed
    LeaseExpired {
        resource: ResourceId,
        holder: RequesterId,
        token: Token,
        deadline: Millis,
    },
    /// Redelivered acquire for a token already queued, leased or retired
    DuplicateIgnored { resource: ResourceId, token: Token },
    /// Release or cancel that matched nothing
    InvalidRelease {
        resource: ResourceId,
        requester: RequesterId,
        token: Token,
    },
}

impl Event {
    /// Event name used in logs (e.g., "lock:granted")
    pub fn name(&self) -> &'static str {
        match self {
            Event::Queued { .. } => "lock:queued",
            Event::Granted { .. } => "lock:granted",
            Event::Released { .. } => "lock:released",
            Event::Cancelled { .. } => "lock:cancelled",
            Event::LeaseExpired { .. } => "lock:expired",
            Event::DuplicateIgnored { .. } => "lock:duplicate",
            Event::InvalidRelease { .. } => "lock:invalid_release",
        }
    }

    pub fn resource(&self) -> &ResourceId {
        match self {
            Event::Queued { resource, .. }
            | Event::Granted { resource, .. }
            | Event::Released { resource, .. }
            | Event::Cancelled { resource, .. }
            | Event::LeaseExpired { resource, .. }
            | Event::DuplicateIgnored { resource, .. }
            | Event::InvalidRelease { resource, .. } => resource,
        }
    }

    pub fn token(&self) -> &Token {
        match self {
            Event::Queued { token, .. }
            | Event::Granted { token, .. }
            | Event::Released { token, .. }
            | Event::Cancelled { token, .. }
            | Event::LeaseExpired { token, .. }
            | Event::DuplicateIgnored { token, .. }
            | Event::InvalidRelease { token, .. } => token,
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
