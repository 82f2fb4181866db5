// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requester-side helper for acquiring and releasing leases

use crate::instance::Accepted;
use crate::{Clock, Runtime, RuntimeError, SystemClock};
use std::future::Future;
use std::time::Duration;
use tracing::Instrument;
use ts_core::{RequesterId, ResourceId, Signal, Token, TokenGen, UuidTokenGen};

/// Per-acquire knobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquireOptions {
    /// Give up waiting after this long; wait forever when unset
    pub deadline: Option<Duration>,
    /// Lease is reclaimed this long after it is granted
    pub lease_timeout: Option<Duration>,
}

impl AcquireOptions {
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_lease_timeout(mut self, lease_timeout: Duration) -> Self {
        self.lease_timeout = Some(lease_timeout);
        self
    }
}

/// Proof of a granted lease; hand it back to release
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a lease that is never released stays held until reclaimed"]
pub struct LeaseHandle {
    resource: ResourceId,
    holder: RequesterId,
    token: Token,
}

impl LeaseHandle {
    pub fn resource(&self) -> &ResourceId {
        &self.resource
    }

    pub fn holder(&self) -> &RequesterId {
        &self.holder
    }

    pub fn token(&self) -> &Token {
        &self.token
    }
}

/// A workflow's view of the coordination runtime
///
/// Every acquire uses a fresh token from the client's generator.
pub struct RequesterClient<C: Clock = SystemClock, G: TokenGen = UuidTokenGen> {
    runtime: Runtime<C>,
    requester: RequesterId,
    tokens: G,
}

impl<C: Clock> RequesterClient<C> {
    pub fn new(runtime: Runtime<C>, requester: impl Into<RequesterId>) -> Self {
        Self::with_token_gen(runtime, requester, UuidTokenGen)
    }
}

impl<C: Clock, G: TokenGen> RequesterClient<C, G> {
    pub fn with_token_gen(runtime: Runtime<C>, requester: impl Into<RequesterId>, tokens: G) -> Self {
        Self {
            runtime,
            requester: requester.into(),
            tokens,
        }
    }

    pub fn requester(&self) -> &RequesterId {
        &self.requester
    }

    /// Acquire a lease on `resource`, waiting until granted or the deadline
    ///
    /// On timeout the queued request is cancelled. A grant that lands in the
    /// same instant as the deadline wins.
    pub async fn acquire(
        &self,
        resource: &ResourceId,
        options: AcquireOptions,
    ) -> Result<LeaseHandle, RuntimeError> {
        let token = self.tokens.next();
        let span = tracing::info_span!(
            "acquire",
            %resource,
            requester = %self.requester,
            %token
        );
        self.acquire_token(resource, token, options)
            .instrument(span)
            .await
    }

    async fn acquire_token(
        &self,
        resource: &ResourceId,
        token: Token,
        options: AcquireOptions,
    ) -> Result<LeaseHandle, RuntimeError> {
        let router = self.runtime.router();
        let mut granted = router.register(resource, &self.requester, &token);
        let signal = Signal::RequestAcquire {
            requester: self.requester.clone(),
            token: token.clone(),
            lease_timeout: options.lease_timeout,
        };
        match self.runtime.deliver(resource, signal, true).await {
            Ok(Accepted::Applied) => {}
            Ok(Accepted::RetiredToken) => {
                // The coordinator ignores it, so no grant would ever arrive
                router.forget(resource, &token);
                tracing::warn!("acquire token already used");
                return Err(RuntimeError::TokenRetired {
                    resource: resource.clone(),
                    token,
                });
            }
            Err(e) => {
                router.forget(resource, &token);
                return Err(e);
            }
        }

        let handle = LeaseHandle {
            resource: resource.clone(),
            holder: self.requester.clone(),
            token: token.clone(),
        };
        let stopped = || RuntimeError::Stopped(resource.clone());

        let Some(deadline) = options.deadline else {
            granted.await.map_err(|_| stopped())?;
            tracing::debug!("lease granted");
            return Ok(handle);
        };

        tokio::select! {
            biased;
            result = &mut granted => {
                result.map_err(|_| stopped())?;
                tracing::debug!("lease granted");
                return Ok(handle);
            }
            _ = tokio::time::sleep(deadline) => {}
        }

        router.forget(resource, &token);
        if granted.try_recv().is_ok() {
            tracing::debug!("lease granted at deadline");
            return Ok(handle);
        }

        // Cancelling a token that was granted after we stopped listening
        // releases it instead.
        let cancel = Signal::RequestCancel {
            requester: self.requester.clone(),
            token: token.clone(),
        };
        if let Err(e) = self.runtime.signal(resource, cancel).await {
            tracing::warn!(error = %e, "failed to cancel timed-out acquire");
        }
        let waited_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
        tracing::info!(waited_ms, "acquire timed out");
        Err(RuntimeError::AcquireTimeout {
            resource: resource.clone(),
            token,
            waited: deadline,
        })
    }

    pub async fn release(&self, lease: LeaseHandle) -> Result<(), RuntimeError> {
        let LeaseHandle {
            resource,
            holder,
            token,
        } = lease;
        self.runtime
            .signal(&resource, Signal::RequestRelease { holder, token })
            .await
    }

    /// Run `work` while holding a lease on `resource`
    ///
    /// The lease is released when `work` finishes, whatever its output.
    pub async fn with_lease<F, Fut, T>(
        &self,
        resource: &ResourceId,
        options: AcquireOptions,
        work: F,
    ) -> Result<T, RuntimeError>
    where
        F: FnOnce(LeaseHandle) -> Fut,
        Fut: Future<Output = T>,
    {
        let lease = self.acquire(resource, options).await?;
        let output = work(lease.clone()).await;
        self.release(lease).await?;
        Ok(output)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
