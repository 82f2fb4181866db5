// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime hosting one coordinator per resource

use crate::instance::{Accepted, Command, Instance, InstanceHandle};
use crate::{Clock, EngineConfig, GrantRouter, PoolInitializer, RuntimeError, SystemClock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, OnceCell};
use ts_core::{
    Capacity, Coordinator, Query, QueryResponse, ResourceId, Signal, StatusReport, Token,
    WaiterState,
};
use ts_storage::{HistoryRecord, HistoryStore};

/// Runtime behaviour configuration
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Lease timeout for acquires that don't carry their own
    pub default_lease_timeout: Option<Duration>,
}

/// Runtime dependencies
pub struct RuntimeDeps {
    pub history: Arc<dyn HistoryStore>,
    pub initializer: Arc<dyn PoolInitializer>,
}

/// Runtime that routes signals and queries to per-resource coordinators
///
/// Coordinators are started lazily. An acquire through
/// [`Runtime::signal_with_start`] creates one if needed; every other entry
/// point only reaches coordinators that exist, loading them from history
/// when this process hasn't touched them yet.
pub struct Runtime<C: Clock = SystemClock> {
    inner: Arc<Inner<C>>,
}

impl<C: Clock> Clone for Runtime<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

type Slot = Arc<OnceCell<InstanceHandle>>;

struct Inner<C: Clock> {
    history: Arc<dyn HistoryStore>,
    initializer: Arc<dyn PoolInitializer>,
    config: RuntimeConfig,
    router: GrantRouter,
    clock: C,
    instances: Mutex<HashMap<ResourceId, Slot>>,
    stopped: AtomicBool,
}

impl Runtime<SystemClock> {
    /// Build a runtime from a loaded config file
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            RuntimeDeps {
                history: config.history_store(),
                initializer: Arc::new(config.initializer()),
            },
            SystemClock::new(),
            config.runtime_config(),
        )
    }
}

impl<C: Clock> Runtime<C> {
    pub fn new(deps: RuntimeDeps, clock: C, config: RuntimeConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                history: deps.history,
                initializer: deps.initializer,
                config,
                router: GrantRouter::new(),
                clock,
                instances: Mutex::new(HashMap::new()),
                stopped: AtomicBool::new(false),
            }),
        }
    }

    pub fn clock(&self) -> &C {
        &self.inner.clock
    }

    pub fn router(&self) -> &GrantRouter {
        &self.inner.router
    }

    /// Deliver a signal, creating the resource's coordinator if needed
    ///
    /// Returns once the signal is recorded in history.
    pub async fn signal_with_start(
        &self,
        resource: &ResourceId,
        signal: Signal,
    ) -> Result<(), RuntimeError> {
        self.deliver(resource, signal, true).await.map(|_| ())
    }

    /// Deliver a signal to an existing coordinator
    ///
    /// Returns once the signal is recorded in history.
    pub async fn signal(&self, resource: &ResourceId, signal: Signal) -> Result<(), RuntimeError> {
        self.deliver(resource, signal, false).await.map(|_| ())
    }

    pub(crate) async fn deliver(
        &self,
        resource: &ResourceId,
        signal: Signal,
        create: bool,
    ) -> Result<Accepted, RuntimeError> {
        let tx = self.instance(resource, create).await?;
        let (reply, accepted) = oneshot::channel();
        let signal = self.with_defaults(signal);
        self.send(resource, &tx, Command::Signal { signal, reply })?;
        let accepted = accepted
            .await
            .map_err(|_| RuntimeError::Stopped(resource.clone()))??;
        Ok(accepted)
    }

    /// Decode a signal by wire name and deliver it
    ///
    /// Acquires start the coordinator; releases and cancels require it.
    pub async fn signal_named(
        &self,
        resource: &ResourceId,
        name: &str,
        payload: serde_json::Value,
    ) -> Result<(), RuntimeError> {
        let signal = Signal::decode(name, payload)?;
        match signal {
            Signal::RequestAcquire { .. } => self.signal_with_start(resource, signal).await,
            _ => self.signal(resource, signal).await,
        }
    }

    pub async fn query(
        &self,
        resource: &ResourceId,
        query: Query,
    ) -> Result<QueryResponse, RuntimeError> {
        self.inspect(resource, move |c| c.query(&query)).await
    }

    /// Parse a query by wire name and answer it
    pub async fn query_named(
        &self,
        resource: &ResourceId,
        kind: &str,
        token: Option<&str>,
    ) -> Result<QueryResponse, RuntimeError> {
        let query = Query::parse(kind, token)?;
        self.query(resource, query).await
    }

    pub async fn status(&self, resource: &ResourceId) -> Result<StatusReport, RuntimeError> {
        self.inspect(resource, |c| c.status()).await
    }

    pub async fn waiter_state(
        &self,
        resource: &ResourceId,
        token: &Token,
    ) -> Result<WaiterState, RuntimeError> {
        let token = token.clone();
        self.inspect(resource, move |c| c.waiter_state(&token))
            .await
    }

    /// Run a read-only closure against a coordinator's current state
    ///
    /// The closure runs between inputs, so it never observes a half-applied
    /// transition.
    pub async fn inspect<T, F>(&self, resource: &ResourceId, f: F) -> Result<T, RuntimeError>
    where
        T: Send + 'static,
        F: FnOnce(&Coordinator) -> T + Send + 'static,
    {
        let tx = self.instance(resource, false).await?;
        let (reply_tx, reply_rx) = oneshot::channel();
        let inspect = Box::new(move |c: &Coordinator| {
            let _ = reply_tx.send(f(c));
        });
        self.send(resource, &tx, Command::Inspect(inspect))?;
        reply_rx
            .await
            .map_err(|_| RuntimeError::Stopped(resource.clone()))
    }

    /// Recorded history of a resource
    pub fn history(&self, resource: &ResourceId) -> Result<Vec<HistoryRecord>, RuntimeError> {
        Ok(self.inner.history.load(resource)?)
    }

    /// Every resource with recorded history
    pub fn resources(&self) -> Result<Vec<ResourceId>, RuntimeError> {
        Ok(self.inner.history.resources()?)
    }

    /// Stop every coordinator and fail outstanding acquires
    pub async fn shutdown(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
        let slots: Vec<(ResourceId, Slot)> = {
            let mut instances = self.inner.instances.lock().unwrap_or_else(|e| e.into_inner());
            instances.drain().collect()
        };
        for (resource, slot) in slots {
            if let Some(handle) = slot.get() {
                handle.stop().await;
                tracing::debug!(%resource, "coordinator shut down");
            }
        }
        self.inner.router.clear();
    }

    fn with_defaults(&self, signal: Signal) -> Signal {
        match signal {
            Signal::RequestAcquire {
                requester,
                token,
                lease_timeout: None,
            } => Signal::RequestAcquire {
                requester,
                token,
                lease_timeout: self.inner.config.default_lease_timeout,
            },
            other => other,
        }
    }

    fn send(
        &self,
        resource: &ResourceId,
        tx: &mpsc::UnboundedSender<Command>,
        command: Command,
    ) -> Result<(), RuntimeError> {
        tx.send(command)
            .map_err(|_| RuntimeError::Stopped(resource.clone()))
    }

    /// Find, load, or create the coordinator for `resource`
    async fn instance(
        &self,
        resource: &ResourceId,
        create: bool,
    ) -> Result<mpsc::UnboundedSender<Command>, RuntimeError> {
        if self.inner.stopped.load(Ordering::SeqCst) {
            return Err(RuntimeError::Stopped(resource.clone()));
        }
        let slot = {
            let mut instances = self.inner.instances.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(instances.entry(resource.clone()).or_default())
        };
        match slot.get_or_try_init(|| self.start(resource, create)).await {
            Ok(handle) => Ok(handle.sender()),
            Err(e) => {
                // Drop the empty slot unless another caller is still trying
                // it; clones are only taken under this lock.
                let mut instances = self.inner.instances.lock().unwrap_or_else(|e| e.into_inner());
                if instances
                    .get(resource)
                    .is_some_and(|s| Arc::ptr_eq(s, &slot) && Arc::strong_count(s) == 2)
                {
                    instances.remove(resource);
                }
                Err(e)
            }
        }
    }

    async fn start(
        &self,
        resource: &ResourceId,
        create: bool,
    ) -> Result<InstanceHandle, RuntimeError> {
        let inner = &self.inner;
        let records = inner.history.load(resource)?;
        let instance = if !records.is_empty() {
            Instance::recover(
                resource.clone(),
                &records,
                Arc::clone(&inner.history),
                inner.router.clone(),
                inner.clock.clone(),
            )?
        } else if create {
            let raw = inner.initializer.capacity(resource).await;
            let capacity = Capacity::validate(resource, raw)?;
            Instance::create(
                resource.clone(),
                capacity,
                Arc::clone(&inner.history),
                inner.router.clone(),
                inner.clock.clone(),
            )?
        } else {
            return Err(RuntimeError::NotRunning(resource.clone()));
        };
        Ok(instance.spawn())
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
