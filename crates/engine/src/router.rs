// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery of grant notifications to waiting requesters
//!
//! A requester registers its token before signalling an acquire. When the
//! coordinator grants that token, the runtime delivers through the router
//! and the requester's pending future resolves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use ts_core::{RequesterId, ResourceId, Token};

/// A grant addressed to one requester
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub resource: ResourceId,
    pub requester: RequesterId,
    pub token: Token,
}

struct Waiting {
    requester: RequesterId,
    tx: oneshot::Sender<Grant>,
}

#[derive(Clone, Default)]
pub struct GrantRouter {
    waiting: Arc<Mutex<HashMap<(ResourceId, Token), Waiting>>>,
}

impl GrantRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in a grant for `token`
    ///
    /// Registering the same token again replaces the earlier receiver.
    pub fn register(
        &self,
        resource: &ResourceId,
        requester: &RequesterId,
        token: &Token,
    ) -> oneshot::Receiver<Grant> {
        let (tx, rx) = oneshot::channel();
        let mut waiting = self.waiting.lock().unwrap_or_else(|e| e.into_inner());
        waiting.insert(
            (resource.clone(), token.clone()),
            Waiting {
                requester: requester.clone(),
                tx,
            },
        );
        rx
    }

    /// Drop a registration; the receiver observes a closed channel
    pub fn forget(&self, resource: &ResourceId, token: &Token) {
        let mut waiting = self.waiting.lock().unwrap_or_else(|e| e.into_inner());
        waiting.remove(&(resource.clone(), token.clone()));
    }

    /// Deliver a grant; returns false when nobody is waiting for it
    pub fn deliver(&self, grant: Grant) -> bool {
        let entry = {
            let mut waiting = self.waiting.lock().unwrap_or_else(|e| e.into_inner());
            waiting.remove(&(grant.resource.clone(), grant.token.clone()))
        };
        match entry {
            Some(w) if w.requester == grant.requester => w.tx.send(grant).is_ok(),
            Some(_) => {
                tracing::warn!(
                    resource = %grant.resource,
                    token = %grant.token,
                    "grant requester does not match registration"
                );
                false
            }
            None => false,
        }
    }

    pub fn pending(&self) -> usize {
        self.waiting.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Drop every registration
    pub fn clear(&self) {
        self.waiting.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
