// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing infrastructure for effects

use crate::effect::{Effect, Event};

/// Trait for operations that should be traced
///
/// Provides consistent naming and structured fields for logging.
pub trait TracedEffect {
    /// Effect name for log spans (e.g., "grant", "set_timer")
    fn name(&self) -> &'static str;

    /// Key-value pairs for structured logging
    fn fields(&self) -> Vec<(&'static str, String)>;
}

impl TracedEffect for Effect {
    fn name(&self) -> &'static str {
        match self {
            Effect::Grant { .. } => "grant",
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
            Effect::Emit(_) => "emit",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Grant {
                resource,
                requester,
                token,
            } => vec![
                ("resource", resource.to_string()),
                ("requester", requester.to_string()),
                ("token", token.to_string()),
            ],
            Effect::SetTimer { id, fire_at } => {
                vec![("timer", id.clone()), ("fire_at", fire_at.to_string())]
            }
            Effect::CancelTimer { id } => vec![("timer", id.clone())],
            Effect::Emit(event) => event_fields(event),
        }
    }
}

fn event_fields(event: &Event) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("event", event.name().to_string()),
        ("resource", event.resource().to_string()),
        ("token", event.token().to_string()),
    ];
    match event {
        Event::Queued {
            requester,
            position,
            ..
        } => {
            fields.push(("requester", requester.to_string()));
            fields.push(("position", position.to_string()));
        }
        Event::Granted {
            holder, available, ..
        }
        | Event::Released {
            holder, available, ..
        } => {
            fields.push(("holder", holder.to_string()));
            fields.push(("available", available.to_string()));
        }
        Event::LeaseExpired {
            holder, deadline, ..
        } => {
            fields.push(("holder", holder.to_string()));
            fields.push(("deadline", deadline.to_string()));
        }
        Event::Cancelled { requester, .. } | Event::InvalidRelease { requester, .. } => {
            fields.push(("requester", requester.to_string()));
        }
        Event::DuplicateIgnored { .. } => {}
    }
    fields
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
