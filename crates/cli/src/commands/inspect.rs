// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only views of coordinators and their history

use crate::output::{self, OutputFormat};
use anyhow::Result;
use std::fmt::Write;
use ts_core::{ResourceId, Signal, StatusReport, Token, WaiterState};
use ts_engine::Runtime;
use ts_storage::{HistoryEntry, HistoryRecord};

pub async fn status(runtime: &Runtime, resource: &ResourceId, format: OutputFormat) -> Result<()> {
    let report = runtime.status(resource).await?;
    output::print(&report, format, format_status)
}

pub async fn waiter(
    runtime: &Runtime,
    resource: &ResourceId,
    token: &Token,
    format: OutputFormat,
) -> Result<()> {
    let state = runtime.waiter_state(resource, token).await?;
    output::print(&state, format, |state| match state {
        WaiterState::Queued { position } => format!("queued at position {}", position),
        WaiterState::Leased { holder } => format!("leased by {}", holder),
        WaiterState::Unknown => "unknown".to_string(),
    })
}

pub fn history(runtime: &Runtime, resource: &ResourceId, format: OutputFormat) -> Result<()> {
    let records = runtime.history(resource)?;
    if records.is_empty() {
        anyhow::bail!("no history for {}", resource);
    }
    output::print(&records, format, |records| {
        records
            .iter()
            .map(format_record)
            .collect::<Vec<_>>()
            .join("\n")
    })
}

pub fn resources(runtime: &Runtime, format: OutputFormat) -> Result<()> {
    let resources = runtime.resources()?;
    output::print(&resources, format, |resources| {
        if resources.is_empty() {
            "No resources".to_string()
        } else {
            resources
                .iter()
                .map(ResourceId::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        }
    })
}

pub(crate) fn format_status(report: &StatusReport) -> String {
    let phase = match report.phase {
        ts_core::Phase::Idle => "idle",
        ts_core::Phase::Active => "active",
    };
    let mut out = String::new();
    let _ = writeln!(out, "Resource: {}", report.resource);
    let _ = writeln!(out, "  Phase: {}", phase);
    let _ = writeln!(
        out,
        "  Permits: {}/{} available",
        report.available, report.capacity
    );
    let _ = write!(out, "  Queued: {}", report.queue_length);
    if !report.holders.is_empty() {
        let _ = write!(out, "\n  Holders:");
        for (holder, count) in &report.holders {
            let _ = write!(out, "\n    {:<20} {}", holder.as_str(), count);
        }
    }
    out
}

fn format_record(record: &HistoryRecord) -> String {
    let detail = match &record.entry {
        HistoryEntry::Started { capacity } => format!("started capacity={}", capacity.get()),
        HistoryEntry::Signal(signal) => {
            let mut line = format!(
                "{} requester={} token={}",
                signal.name(),
                signal.requester(),
                signal.token()
            );
            if let Signal::RequestAcquire {
                lease_timeout: Some(timeout),
                ..
            } = signal
            {
                let _ = write!(line, " lease_timeout={}ms", timeout.as_millis());
            }
            line
        }
        HistoryEntry::TimerFired { id } => format!("timer {}", id),
    };
    format!("{:>5} {:>14} {}", record.seq, record.at, detail)
}
