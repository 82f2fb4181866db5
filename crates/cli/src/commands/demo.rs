// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated workflows contending for a mutex or pool

use crate::commands::inspect::format_status;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use ts_core::ResourceId;
use ts_engine::{
    AcquireOptions, EngineConfig, FixedCapacity, RequesterClient, Runtime, RuntimeDeps,
    SystemClock,
};

#[derive(Args)]
pub struct DemoArgs {
    #[command(subcommand)]
    pub kind: DemoKind,
}

#[derive(Subcommand)]
pub enum DemoKind {
    /// Workers take turns on a single-permit lock
    Mutex(DemoOptions),
    /// Workers share a pool of permits
    Pool {
        /// Number of permits
        #[arg(long, default_value_t = 3)]
        capacity: i64,
        #[command(flatten)]
        options: DemoOptions,
    },
}

#[derive(Args)]
pub struct DemoOptions {
    /// Resource name
    #[arg(long)]
    pub resource: Option<String>,
    /// Number of simulated workflows
    #[arg(long, default_value_t = 4)]
    pub workers: usize,
    /// How long each workflow holds its lease, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub hold_ms: u64,
    /// Give up waiting after this many milliseconds
    #[arg(long)]
    pub deadline_ms: Option<u64>,
    /// Reclaim leases held longer than this many milliseconds
    #[arg(long)]
    pub lease_timeout_ms: Option<u64>,
}

pub async fn run(args: DemoArgs, config: &EngineConfig, format: OutputFormat) -> Result<()> {
    let (capacity, options, default_name) = match args.kind {
        DemoKind::Mutex(options) => (1, options, "demo-mutex"),
        DemoKind::Pool { capacity, options } => (capacity, options, "demo-pool"),
    };
    let resource = ResourceId::new(
        options
            .resource
            .clone()
            .unwrap_or_else(|| default_name.to_string()),
    );

    let runtime = Runtime::new(
        RuntimeDeps {
            history: config.history_store(),
            initializer: Arc::new(FixedCapacity(capacity)),
        },
        SystemClock::new(),
        config.runtime_config(),
    );

    let acquire = AcquireOptions {
        deadline: options.deadline_ms.map(Duration::from_millis),
        lease_timeout: options.lease_timeout_ms.map(Duration::from_millis),
    };
    let hold = Duration::from_millis(options.hold_ms);
    let start = Instant::now();

    let mut workers = Vec::with_capacity(options.workers);
    for n in 1..=options.workers {
        let name = format!("worker-{}", n);
        let client = RequesterClient::new(runtime.clone(), name.as_str());
        let resource = resource.clone();
        workers.push(tokio::spawn(async move {
            let outcome = client
                .with_lease(&resource, acquire, |lease| async move {
                    println!(
                        "{:>6}ms {} acquired {} (token {})",
                        start.elapsed().as_millis(),
                        lease.holder(),
                        lease.resource(),
                        lease.token()
                    );
                    tokio::time::sleep(hold).await;
                })
                .await;
            match outcome {
                Ok(()) => println!(
                    "{:>6}ms {} released",
                    start.elapsed().as_millis(),
                    client.requester()
                ),
                Err(e) if e.is_acquire_timeout() => println!(
                    "{:>6}ms {} gave up: {}",
                    start.elapsed().as_millis(),
                    client.requester(),
                    e
                ),
                Err(e) => return Err(e),
            }
            Ok(())
        }));
    }

    for worker in workers {
        worker.await??;
    }

    let report = runtime.status(&resource).await?;
    runtime.shutdown().await;
    output::print(&report, format, format_status)
}
