// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signals accepted by the coordinator and their boundary decoding

use crate::error::CoordinationError;
use crate::id::{RequesterId, Token};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Signals a coordinator accepts, decoded once at the boundary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "payload")]
pub enum Signal {
    RequestAcquire {
        requester: RequesterId,
        token: Token,
        /// Lease is force-released this long after it is granted
        #[serde(
            default,
            with = "humantime_serde",
            skip_serializing_if = "Option::is_none"
        )]
        lease_timeout: Option<Duration>,
    },
    RequestRelease {
        holder: RequesterId,
        token: Token,
    },
    RequestCancel {
        requester: RequesterId,
        token: Token,
    },
}

/// External signal names
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalName {
    RequestAcquire,
    RequestRelease,
    RequestCancel,
}

impl SignalName {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalName::RequestAcquire => "RequestAcquire",
            SignalName::RequestRelease => "RequestRelease",
            SignalName::RequestCancel => "RequestCancel",
        }
    }
}

impl FromStr for SignalName {
    type Err = CoordinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RequestAcquire" => Ok(SignalName::RequestAcquire),
            "RequestRelease" => Ok(SignalName::RequestRelease),
            "RequestCancel" => Ok(SignalName::RequestCancel),
            other => Err(CoordinationError::UnknownSignal(other.to_string())),
        }
    }
}

impl std::fmt::Display for SignalName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Signal {
    /// Decode a named signal with a structured payload
    pub fn decode(name: &str, payload: serde_json::Value) -> Result<Signal, CoordinationError> {
        let name: SignalName = name.parse()?;
        let tagged = serde_json::json!({ "signal": name.as_str(), "payload": payload });
        serde_json::from_value(tagged).map_err(|e| CoordinationError::MalformedSignal {
            signal: name.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn name(&self) -> SignalName {
        match self {
            Signal::RequestAcquire { .. } => SignalName::RequestAcquire,
            Signal::RequestRelease { .. } => SignalName::RequestRelease,
            Signal::RequestCancel { .. } => SignalName::RequestCancel,
        }
    }

    /// The requester (or holder) that sent this signal
    pub fn requester(&self) -> &RequesterId {
        match self {
            Signal::RequestAcquire { requester, .. } | Signal::RequestCancel { requester, .. } => {
                requester
            }
            Signal::RequestRelease { holder, .. } => holder,
        }
    }

    pub fn token(&self) -> &Token {
        match self {
            Signal::RequestAcquire { token, .. }
            | Signal::RequestRelease { token, .. }
            | Signal::RequestCancel { token, .. } => token,
        }
    }
}

/// Everything that can advance a coordinator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    Signal(Signal),
    /// A durable timer armed through `Effect::SetTimer` fired
    TimerFired { id: String },
}

impl From<Signal> for Input {
    fn from(signal: Signal) -> Self {
        Input::Signal(signal)
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
