// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-resource coordinator actor
//!
//! Each resource runs as one task that owns its [`Coordinator`]. Inputs are
//! recorded to history before they are applied, so a restarted actor
//! rebuilds exactly the state the previous one had.

use crate::router::{Grant, GrantRouter};
use crate::{Clock, Scheduler};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::Instrument;
use ts_core::{
    Capacity, Coordinator, Effect, Event, Input, Millis, ResourceId, Signal, TracedEffect,
};
use ts_storage::{rebuild, HistoryEntry, HistoryError, HistoryRecord, HistoryStore};

/// Delay before re-firing a timer whose record failed
const TIMER_RETRY_MS: Millis = 1_000;

pub(crate) type Inspect = Box<dyn FnOnce(&Coordinator) + Send>;

/// How the coordinator took a recorded signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Accepted {
    Applied,
    /// Acquire for a token that was already released or cancelled
    RetiredToken,
}

pub(crate) enum Command {
    /// Record and apply a signal, replying once it is durable
    Signal {
        signal: Signal,
        reply: oneshot::Sender<Result<Accepted, HistoryError>>,
    },
    /// Run a read-only closure against current state
    Inspect(Inspect),
    Shutdown,
}

pub(crate) struct InstanceHandle {
    tx: mpsc::UnboundedSender<Command>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl InstanceHandle {
    pub(crate) fn sender(&self) -> mpsc::UnboundedSender<Command> {
        self.tx.clone()
    }

    /// Stop the actor and wait for it to exit
    pub(crate) async fn stop(&self) {
        let _ = self.tx.send(Command::Shutdown);
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "coordinator task failed");
            }
        }
    }
}

pub(crate) struct Instance<C: Clock> {
    coordinator: Coordinator,
    scheduler: Scheduler,
    history: Arc<dyn HistoryStore>,
    router: GrantRouter,
    clock: C,
}

impl<C: Clock> Instance<C> {
    /// Start a fresh coordinator, recording its capacity as the first entry
    pub(crate) fn create(
        resource: ResourceId,
        capacity: Capacity,
        history: Arc<dyn HistoryStore>,
        router: GrantRouter,
        clock: C,
    ) -> Result<Self, HistoryError> {
        history.append(&resource, clock.now_ms(), HistoryEntry::Started { capacity })?;
        tracing::info!(%resource, capacity = capacity.get(), "coordinator started");
        Ok(Self {
            coordinator: Coordinator::new(resource, capacity),
            scheduler: Scheduler::new(),
            history,
            router,
            clock,
        })
    }

    /// Rebuild a coordinator from recorded history
    ///
    /// Replayed effects are discarded except timer arm/cancel. An overdue
    /// timer fires as soon as the actor runs.
    pub(crate) fn recover(
        resource: ResourceId,
        records: &[HistoryRecord],
        history: Arc<dyn HistoryStore>,
        router: GrantRouter,
        clock: C,
    ) -> Result<Self, HistoryError> {
        let rebuilt = rebuild(&resource, records)?;
        let mut scheduler = Scheduler::new();
        for effect in &rebuilt.effects {
            match effect {
                Effect::SetTimer { id, fire_at } => scheduler.set_timer(id.clone(), *fire_at),
                Effect::CancelTimer { id } => scheduler.cancel_timer(id),
                Effect::Grant { .. } | Effect::Emit(_) => {}
            }
        }
        tracing::info!(
            %resource,
            last_seq = rebuilt.last_seq,
            leased = rebuilt.coordinator.ledger().active(),
            queued = rebuilt.coordinator.queue().len(),
            "coordinator recovered"
        );
        Ok(Self {
            coordinator: rebuilt.coordinator,
            scheduler,
            history,
            router,
            clock,
        })
    }

    pub(crate) fn spawn(self) -> InstanceHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let span = tracing::info_span!("coordinator", resource = %self.coordinator.resource());
        let task = tokio::spawn(self.run(rx).instrument(span));
        InstanceHandle {
            tx,
            task: Mutex::new(Some(task)),
        }
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        // Timers that came due while nothing was running
        self.fire_due_timers();
        loop {
            let wake = self.scheduler.next_deadline().map(|fire_at| {
                Duration::from_millis(fire_at.saturating_sub(self.clock.now_ms()))
            });
            let timer = async {
                match wake {
                    Some(delay) => tokio::time::sleep(delay).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                biased;
                _ = timer => self.fire_due_timers(),
                command = rx.recv() => match command {
                    Some(Command::Signal { signal, reply }) => {
                        let _ = reply.send(self.accept(signal));
                    }
                    Some(Command::Inspect(inspect)) => inspect(&self.coordinator),
                    Some(Command::Shutdown) | None => break,
                },
            }
        }
        tracing::debug!("coordinator stopped");
    }

    fn fire_due_timers(&mut self) {
        let now = self.clock.now_ms();
        for id in self.scheduler.fired_timers(now) {
            tracing::debug!(timer = %id, "timer fired");
            if let Err(e) = self.step(Input::TimerFired { id: id.clone() }) {
                tracing::error!(error = %e, timer = %id, "failed to record timer, retrying");
                self.scheduler.set_timer(id, now + TIMER_RETRY_MS);
            }
        }
    }

    fn accept(&mut self, signal: Signal) -> Result<Accepted, HistoryError> {
        let retired = matches!(
            &signal,
            Signal::RequestAcquire { token, .. } if self.coordinator.is_retired(token)
        );
        if let Err(e) = self.step(Input::Signal(signal)) {
            tracing::error!(error = %e, "failed to record signal, rejecting it");
            return Err(e);
        }
        Ok(if retired {
            Accepted::RetiredToken
        } else {
            Accepted::Applied
        })
    }

    /// Record an input, then apply it and execute the resulting effects
    ///
    /// An input that cannot be recorded is not applied.
    fn step(&mut self, input: Input) -> Result<(), HistoryError> {
        let at = self.clock.now_ms();
        let resource = self.coordinator.resource().clone();
        let record = self
            .history
            .append(&resource, at, HistoryEntry::from(input.clone()))?;
        tracing::trace!(seq = record.seq, at, "recorded");

        for effect in self.coordinator.apply(&input, at) {
            self.execute(effect);
        }
        Ok(())
    }

    fn execute(&mut self, effect: Effect) {
        tracing::debug!(effect = effect.name(), fields = ?effect.fields(), "executing");
        match effect {
            Effect::Grant {
                resource,
                requester,
                token,
            } => {
                let grant = Grant {
                    resource,
                    requester,
                    token,
                };
                if !self.router.deliver(grant) {
                    tracing::debug!("no live waiter for grant");
                }
            }
            Effect::SetTimer { id, fire_at } => self.scheduler.set_timer(id, fire_at),
            Effect::CancelTimer { id } => self.scheduler.cancel_timer(&id),
            Effect::Emit(event) => log_event(&event),
        }
    }
}

fn log_event(event: &Event) {
    let name = event.name();
    let token = event.token();
    match event {
        Event::Queued {
            requester,
            position,
            ..
        } => tracing::info!(event = name, %requester, %token, position, "queued"),
        Event::Granted {
            holder, available, ..
        } => tracing::info!(event = name, %holder, %token, available, "granted"),
        Event::Released {
            holder, available, ..
        } => tracing::info!(event = name, %holder, %token, available, "released"),
        Event::Cancelled { requester, .. } => {
            tracing::info!(event = name, %requester, %token, "cancelled")
        }
        Event::LeaseExpired {
            holder, deadline, ..
        } => tracing::warn!(event = name, %holder, %token, deadline, "lease expired"),
        Event::DuplicateIgnored { .. } => {
            tracing::debug!(event = name, %token, "duplicate acquire ignored")
        }
        Event::InvalidRelease { requester, .. } => {
            tracing::warn!(event = name, %requester, %token, "release matched no lease")
        }
    }
}
