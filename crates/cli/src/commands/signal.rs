// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use anyhow::{Context, Result};
use clap::Args;
use ts_core::ResourceId;
use ts_engine::Runtime;

#[derive(Args)]
pub struct SignalArgs {
    /// Resource the signal addresses
    pub resource: String,
    /// Signal name: RequestAcquire, RequestRelease, or RequestCancel
    pub name: String,
    /// JSON payload, e.g. '{"requester":"a","token":"t1"}'
    #[arg(default_value = "{}")]
    pub payload: String,
}

pub async fn run(runtime: &Runtime, args: SignalArgs) -> Result<()> {
    let payload: serde_json::Value =
        serde_json::from_str(&args.payload).context("payload is not valid JSON")?;
    let resource = ResourceId::new(args.resource);
    runtime
        .signal_named(&resource, &args.name, payload)
        .await?;
    println!("Delivered {} to {}", args.name, resource);
    Ok(())
}
