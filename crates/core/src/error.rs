// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for coordinator construction and boundary decoding

use crate::id::ResourceId;
use thiserror::Error;

/// Errors raised before an input ever reaches a coordinator
///
/// The coordinator itself never fails: duplicate and stale signals are
/// absorbed as events. These errors cover creation and decoding only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinationError {
    #[error("capacity for {resource} must be positive, got {capacity}")]
    CapacityMisconfigured { resource: ResourceId, capacity: i64 },
    #[error("unknown signal: {0}")]
    UnknownSignal(String),
    #[error("malformed {signal} payload: {reason}")]
    MalformedSignal { signal: String, reason: String },
    #[error("unknown query kind: {0}")]
    UnknownQuery(String),
    #[error("query '{0}' requires a token")]
    MissingToken(String),
}
