// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime

use crate::ConfigError;
use std::time::Duration;
use thiserror::Error;
use ts_core::{CoordinationError, ResourceId, Token};
use ts_storage::HistoryError;

/// Errors that can occur in the runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("acquire of {resource} timed out after {waited:?} (token {token})")]
    AcquireTimeout {
        resource: ResourceId,
        token: Token,
        waited: Duration,
    },
    #[error("token {token} was already used on {resource}")]
    TokenRetired { resource: ResourceId, token: Token },
    #[error(transparent)]
    Coordination(#[from] CoordinationError),
    #[error("history error: {0}")]
    History(#[from] HistoryError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("no coordinator for resource: {0}")]
    NotRunning(ResourceId),
    #[error("coordinator stopped: {0}")]
    Stopped(ResourceId),
}

impl RuntimeError {
    pub fn is_acquire_timeout(&self) -> bool {
        matches!(self, RuntimeError::AcquireTimeout { .. })
    }
}
