// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only queries over a coordinator

use super::coordinator::{Coordinator, Phase};
use crate::error::CoordinationError;
use crate::id::{RequesterId, ResourceId, Token};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Query kinds accepted at the boundary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryKind {
    Status,
    Waiter,
}

impl FromStr for QueryKind {
    type Err = CoordinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(QueryKind::Status),
            "waiter" => Ok(QueryKind::Waiter),
            other => Err(CoordinationError::UnknownQuery(other.to_string())),
        }
    }
}

/// A decoded query
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    Status,
    Waiter { token: Token },
}

impl Query {
    /// Decode a query from its kind string and optional token argument
    pub fn parse(kind: &str, token: Option<&str>) -> Result<Query, CoordinationError> {
        match kind.parse::<QueryKind>()? {
            QueryKind::Status => Ok(Query::Status),
            QueryKind::Waiter => {
                let token = token.ok_or_else(|| CoordinationError::MissingToken(kind.to_string()))?;
                Ok(Query::Waiter {
                    token: Token::new(token),
                })
            }
        }
    }
}

/// Snapshot answered by `Query::Status`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub resource: ResourceId,
    pub capacity: u32,
    pub available: u32,
    pub queue_length: usize,
    pub phase: Phase,
    /// Held token count per holder
    pub holders: BTreeMap<RequesterId, usize>,
}

/// Where a token currently stands
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum WaiterState {
    Queued { position: usize },
    Leased { holder: RequesterId },
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Status(StatusReport),
    Waiter(WaiterState),
}

impl Coordinator {
    /// Answer a query; never mutates state
    pub fn query(&self, query: &Query) -> QueryResponse {
        match query {
            Query::Status => QueryResponse::Status(self.status()),
            Query::Waiter { token } => QueryResponse::Waiter(self.waiter_state(token)),
        }
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            resource: self.resource().clone(),
            capacity: self.ledger().capacity().get(),
            available: self.ledger().available(),
            queue_length: self.queue().len(),
            phase: self.phase(),
            holders: self.ledger().holder_counts(),
        }
    }

    pub fn waiter_state(&self, token: &Token) -> WaiterState {
        if let Some(position) = self.queue().position(token) {
            return WaiterState::Queued { position };
        }
        match self.ledger().lease(token) {
            Some(lease) => WaiterState::Leased {
                holder: lease.holder.clone(),
            },
            None => WaiterState::Unknown,
        }
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
