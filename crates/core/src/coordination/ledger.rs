// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Permit ledger: which holders own permits, against a fixed capacity

use super::Millis;
use crate::error::CoordinationError;
use crate::id::{RequesterId, ResourceId, Token};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Total permits for a resource; always at least one
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Capacity(u32);

impl Capacity {
    /// Capacity of a pure mutex
    pub const MUTEX: Capacity = Capacity(1);

    /// Validate a capacity reported by configuration or an initializer
    pub fn validate(resource: &ResourceId, value: i64) -> Result<Self, CoordinationError> {
        match u32::try_from(value) {
            Ok(n) if n > 0 => Ok(Capacity(n)),
            _ => Err(CoordinationError::CapacityMisconfigured {
                resource: resource.clone(),
                capacity: value,
            }),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Capacity {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            Err("capacity must be positive".to_string())
        } else {
            Ok(Capacity(value))
        }
    }
}

impl From<Capacity> for u32 {
    fn from(capacity: Capacity) -> Self {
        capacity.0
    }
}

/// A granted permit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lease {
    pub holder: RequesterId,
    pub token: Token,
    pub granted_at: Millis,
    /// Reclaimed by the coordinator once passed
    pub deadline: Option<Millis>,
}

/// Active leases, in grant order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermitLedger {
    capacity: Capacity,
    leases: Vec<Lease>,
}

impl PermitLedger {
    pub fn new(capacity: Capacity) -> Self {
        Self {
            capacity,
            leases: Vec::new(),
        }
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Number of active leases
    pub fn active(&self) -> usize {
        self.leases.len()
    }

    /// Permits not currently leased
    pub fn available(&self) -> u32 {
        let active = u32::try_from(self.leases.len()).unwrap_or(u32::MAX);
        self.capacity.get().saturating_sub(active)
    }

    pub fn is_empty(&self) -> bool {
        self.leases.is_empty()
    }

    pub fn contains(&self, token: &Token) -> bool {
        self.leases.iter().any(|l| &l.token == token)
    }

    pub fn lease(&self, token: &Token) -> Option<&Lease> {
        self.leases.iter().find(|l| &l.token == token)
    }

    /// Record a lease, handing it back when no permit is free
    pub fn try_grant(&mut self, lease: Lease) -> Result<(), Lease> {
        if self.available() == 0 {
            return Err(lease);
        }
        self.leases.push(lease);
        Ok(())
    }

    /// Remove the lease matching both holder and token
    pub fn release(&mut self, holder: &RequesterId, token: &Token) -> Option<Lease> {
        let index = self
            .leases
            .iter()
            .position(|l| &l.token == token && &l.holder == holder)?;
        Some(self.leases.remove(index))
    }

    /// Remove and return every lease whose deadline is at or before `at`
    pub fn take_expired(&mut self, at: Millis) -> Vec<Lease> {
        let (expired, live): (Vec<_>, Vec<_>) = self
            .leases
            .drain(..)
            .partition(|l| l.deadline.is_some_and(|d| d <= at));
        self.leases = live;
        expired
    }

    /// Earliest deadline among active leases
    pub fn earliest_deadline(&self) -> Option<Millis> {
        self.leases.iter().filter_map(|l| l.deadline).min()
    }

    /// Held permit count per holder
    pub fn holder_counts(&self) -> BTreeMap<RequesterId, usize> {
        let mut counts = BTreeMap::new();
        for lease in &self.leases {
            *counts.entry(lease.holder.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lease> {
        self.leases.iter()
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
