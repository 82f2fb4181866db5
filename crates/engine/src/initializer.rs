// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool initializers decide the capacity of a newly created coordinator
//!
//! The runtime consults the initializer exactly once per resource, on the
//! first acquire. Recovered coordinators take their capacity from history.

use async_trait::async_trait;
use std::collections::BTreeMap;
use ts_core::ResourceId;

#[async_trait]
pub trait PoolInitializer: Send + Sync + 'static {
    /// Raw capacity for `resource`; values below 1 fail creation
    async fn capacity(&self, resource: &ResourceId) -> i64;
}

/// Same capacity for every resource
#[derive(Debug, Clone, Copy)]
pub struct FixedCapacity(pub i64);

impl FixedCapacity {
    pub const MUTEX: FixedCapacity = FixedCapacity(1);
}

#[async_trait]
impl PoolInitializer for FixedCapacity {
    async fn capacity(&self, _resource: &ResourceId) -> i64 {
        self.0
    }
}

/// Capacity computed by a closure over the resource id
pub struct FnInitializer<F>(F);

impl<F> FnInitializer<F>
where
    F: Fn(&ResourceId) -> i64 + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> PoolInitializer for FnInitializer<F>
where
    F: Fn(&ResourceId) -> i64 + Send + Sync + 'static,
{
    async fn capacity(&self, resource: &ResourceId) -> i64 {
        (self.0)(resource)
    }
}

/// Named pools with a fallback capacity
#[derive(Debug, Clone)]
pub struct ConfigInitializer {
    default_capacity: i64,
    pools: BTreeMap<String, i64>,
}

impl ConfigInitializer {
    pub fn new(default_capacity: i64, pools: BTreeMap<String, i64>) -> Self {
        Self {
            default_capacity,
            pools,
        }
    }
}

#[async_trait]
impl PoolInitializer for ConfigInitializer {
    async fn capacity(&self, resource: &ResourceId) -> i64 {
        self.pools
            .get(resource.as_str())
            .copied()
            .unwrap_or(self.default_capacity)
    }
}

#[cfg(test)]
#[path = "initializer_tests.rs"]
mod tests;
