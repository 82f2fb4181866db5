// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered collection of pending acquire requests

use crate::id::{RequesterId, Token};
use std::collections::VecDeque;
use std::time::Duration;

/// A pending acquire request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaiterEntry {
    pub requester: RequesterId,
    pub token: Token,
    /// Logical arrival position, not wall-clock
    pub enqueued_at: u64,
    /// Lease duration to apply once granted
    pub lease_timeout: Option<Duration>,
}

/// FIFO of waiters in the order their acquire signals were applied
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WaiterQueue {
    entries: VecDeque<WaiterEntry>,
    next_seq: u64,
}

impl WaiterQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, token: &Token) -> bool {
        self.entries.iter().any(|e| &e.token == token)
    }

    /// Zero-based position of a token in the queue
    pub fn position(&self, token: &Token) -> Option<usize> {
        self.entries.iter().position(|e| &e.token == token)
    }

    /// Append a waiter, returning its logical arrival position
    pub fn push(
        &mut self,
        requester: RequesterId,
        token: Token,
        lease_timeout: Option<Duration>,
    ) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(WaiterEntry {
            requester,
            token,
            enqueued_at: seq,
            lease_timeout,
        });
        seq
    }

    pub fn front(&self) -> Option<&WaiterEntry> {
        self.entries.front()
    }

    pub fn pop_front(&mut self) -> Option<WaiterEntry> {
        self.entries.pop_front()
    }

    /// Remove the entry matching both requester and token
    pub fn remove(&mut self, requester: &RequesterId, token: &Token) -> Option<WaiterEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| &e.token == token && &e.requester == requester)?;
        self.entries.remove(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WaiterEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
