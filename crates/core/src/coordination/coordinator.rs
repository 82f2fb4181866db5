// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator state machine for one resource
//!
//! Applies acquire, release and cancel signals strictly one at a time,
//! grants permits in FIFO order, and reclaims leases whose deadline passed.

use super::ledger::{Capacity, Lease, PermitLedger};
use super::queue::WaiterQueue;
use super::signal::{Input, Signal};
use super::Millis;
use crate::effect::{Effect, Event};
use crate::id::{RequesterId, ResourceId, Token};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// How many released, cancelled or reclaimed tokens are remembered
pub const RETIRED_TOKEN_WINDOW: usize = 256;

/// Coarse coordinator state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No waiters and no leases
    Idle,
    Active,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ArmedTimer {
    id: String,
    fire_at: Millis,
}

/// The per-resource coordinator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coordinator {
    resource: ResourceId,
    queue: WaiterQueue,
    ledger: PermitLedger,
    retired: VecDeque<Token>,
    armed: Option<ArmedTimer>,
    timer_seq: u64,
}

impl Coordinator {
    pub fn new(resource: ResourceId, capacity: Capacity) -> Self {
        Self {
            resource,
            queue: WaiterQueue::new(),
            ledger: PermitLedger::new(capacity),
            retired: VecDeque::new(),
            armed: None,
            timer_seq: 0,
        }
    }

    /// Rebuild a coordinator by applying recorded inputs in order
    pub fn replay<'a>(
        resource: ResourceId,
        capacity: Capacity,
        inputs: impl IntoIterator<Item = (&'a Input, Millis)>,
    ) -> (Self, Vec<Effect>) {
        let mut coordinator = Self::new(resource, capacity);
        let mut effects = Vec::new();
        for (input, at) in inputs {
            effects.extend(coordinator.apply(input, at));
        }
        (coordinator, effects)
    }

    pub fn resource(&self) -> &ResourceId {
        &self.resource
    }

    pub fn queue(&self) -> &WaiterQueue {
        &self.queue
    }

    pub fn ledger(&self) -> &PermitLedger {
        &self.ledger
    }

    pub fn phase(&self) -> Phase {
        if self.queue.is_empty() && self.ledger.is_empty() {
            Phase::Idle
        } else {
            Phase::Active
        }
    }

    /// Id and fire time of the armed reclamation timer, if any
    pub fn armed_timer(&self) -> Option<(&str, Millis)> {
        self.armed.as_ref().map(|t| (t.id.as_str(), t.fire_at))
    }

    pub fn is_retired(&self, token: &Token) -> bool {
        self.retired.contains(token)
    }

    /// Pure state transition function
    pub fn transition(&self, input: &Input, at: Millis) -> (Coordinator, Vec<Effect>) {
        let mut next = self.clone();
        let effects = next.apply(input, at);
        (next, effects)
    }

    /// Apply one input in place, returning the effects to execute
    ///
    /// `at` is the timestamp recorded with the input; it is the only notion
    /// of time the coordinator sees.
    pub fn apply(&mut self, input: &Input, at: Millis) -> Vec<Effect> {
        let mut effects = Vec::new();

        match input {
            Input::Signal(Signal::RequestAcquire {
                requester,
                token,
                lease_timeout,
            }) => self.acquire(requester, token, *lease_timeout, at, &mut effects),

            Input::Signal(Signal::RequestRelease { holder, token }) => {
                if !self.release(holder, token, at, &mut effects) {
                    effects.push(self.invalid_release(holder, token));
                }
            }

            Input::Signal(Signal::RequestCancel { requester, token }) => {
                if self.queue.remove(requester, token).is_some() {
                    self.retire(token.clone());
                    effects.push(Effect::Emit(Event::Cancelled {
                        resource: self.resource.clone(),
                        requester: requester.clone(),
                        token: token.clone(),
                    }));
                } else if !self.release(requester, token, at, &mut effects) {
                    effects.push(self.invalid_release(requester, token));
                }
            }

            Input::TimerFired { id } => {
                if self.armed.as_ref().is_some_and(|t| &t.id == id) {
                    self.armed = None;
                }
                self.reclaim_expired(at, &mut effects);
            }
        }

        self.rearm(&mut effects);
        effects
    }

    fn acquire(
        &mut self,
        requester: &RequesterId,
        token: &Token,
        lease_timeout: Option<Duration>,
        at: Millis,
        effects: &mut Vec<Effect>,
    ) {
        if self.queue.contains(token) || self.ledger.contains(token) || self.is_retired(token) {
            effects.push(Effect::Emit(Event::DuplicateIgnored {
                resource: self.resource.clone(),
                token: token.clone(),
            }));
            return;
        }

        self.queue
            .push(requester.clone(), token.clone(), lease_timeout);
        self.grant_pass(at, effects);

        if let Some(position) = self.queue.position(token) {
            effects.push(Effect::Emit(Event::Queued {
                resource: self.resource.clone(),
                requester: requester.clone(),
                token: token.clone(),
                position,
            }));
        }
    }

    /// Returns false when no lease matched
    fn release(
        &mut self,
        holder: &RequesterId,
        token: &Token,
        at: Millis,
        effects: &mut Vec<Effect>,
    ) -> bool {
        let Some(lease) = self.ledger.release(holder, token) else {
            return false;
        };
        self.retire(lease.token.clone());
        effects.push(Effect::Emit(Event::Released {
            resource: self.resource.clone(),
            holder: lease.holder,
            token: lease.token,
            available: self.ledger.available(),
        }));
        self.grant_pass(at, effects);
        true
    }

    fn reclaim_expired(&mut self, at: Millis, effects: &mut Vec<Effect>) {
        let expired = self.ledger.take_expired(at);
        if expired.is_empty() {
            return;
        }
        for lease in expired {
            self.retire(lease.token.clone());
            effects.push(Effect::Emit(Event::LeaseExpired {
                resource: self.resource.clone(),
                holder: lease.holder,
                token: lease.token,
                deadline: lease.deadline.unwrap_or(at),
            }));
        }
        self.grant_pass(at, effects);
    }

    /// Promote queued waiters to leases while permits are available
    fn grant_pass(&mut self, at: Millis, effects: &mut Vec<Effect>) {
        while self.ledger.available() > 0 {
            let Some(entry) = self.queue.pop_front() else {
                break;
            };
            let deadline = entry
                .lease_timeout
                .map(|d| at.saturating_add(u64::try_from(d.as_millis()).unwrap_or(u64::MAX)));
            let lease = Lease {
                holder: entry.requester.clone(),
                token: entry.token.clone(),
                granted_at: at,
                deadline,
            };
            if self.ledger.try_grant(lease).is_err() {
                break;
            }
            effects.push(Effect::Grant {
                resource: self.resource.clone(),
                requester: entry.requester.clone(),
                token: entry.token.clone(),
            });
            effects.push(Effect::Emit(Event::Granted {
                resource: self.resource.clone(),
                holder: entry.requester,
                token: entry.token,
                available: self.ledger.available(),
            }));
        }
    }

    /// Keep exactly one timer armed at the earliest lease deadline
    fn rearm(&mut self, effects: &mut Vec<Effect>) {
        let wanted = self.ledger.earliest_deadline();
        if self.armed.as_ref().map(|t| t.fire_at) == wanted {
            return;
        }
        if let Some(old) = self.armed.take() {
            effects.push(Effect::CancelTimer { id: old.id });
        }
        if let Some(fire_at) = wanted {
            self.timer_seq += 1;
            let id = format!("reclaim-{}", self.timer_seq);
            effects.push(Effect::SetTimer {
                id: id.clone(),
                fire_at,
            });
            self.armed = Some(ArmedTimer { id, fire_at });
        }
    }

    fn retire(&mut self, token: Token) {
        self.retired.push_back(token);
        while self.retired.len() > RETIRED_TOKEN_WINDOW {
            self.retired.pop_front();
        }
    }

    fn invalid_release(&self, requester: &RequesterId, token: &Token) -> Effect {
        Effect::Emit(Event::InvalidRelease {
            resource: self.resource.clone(),
            requester: requester.clone(),
            token: token.clone(),
        })
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
