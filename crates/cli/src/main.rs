// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ts - Turnstile CLI

mod commands;
mod completions;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{demo, inspect, signal};
use output::OutputFormat;
use std::path::PathBuf;
use ts_core::{ResourceId, Token};
use ts_engine::{EngineConfig, Runtime};

#[derive(Parser)]
#[command(
    name = "ts",
    version,
    about = "Turnstile - durable mutexes and resource pools"
)]
struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of per-resource history logs; overrides the config file
    #[arg(long, global = true)]
    history_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run simulated workflows contending for a resource
    Demo(demo::DemoArgs),
    /// Deliver a signal to a resource's coordinator
    Signal(signal::SignalArgs),
    /// Show a resource's capacity, holders, and queue
    Status {
        resource: String,
    },
    /// Show where an acquire token stands
    Waiter {
        resource: String,
        token: String,
    },
    /// Print a resource's recorded history
    History {
        resource: String,
    },
    /// List resources with recorded history
    Resources,
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        completions::generate_completions::<Cli>(args.shell);
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = cli.history_dir {
        config.history_dir = Some(dir);
    }

    let format = cli.format;
    if let Commands::Demo(args) = cli.command {
        return demo::run(args, &config, format).await;
    }

    let runtime = Runtime::from_config(&config);
    let result = match cli.command {
        Commands::Signal(args) => signal::run(&runtime, args).await,
        Commands::Status { resource } => {
            inspect::status(&runtime, &ResourceId::new(resource), format).await
        }
        Commands::Waiter { resource, token } => {
            inspect::waiter(&runtime, &ResourceId::new(resource), &Token::new(token), format).await
        }
        Commands::History { resource } => {
            inspect::history(&runtime, &ResourceId::new(resource), format)
        }
        Commands::Resources => inspect::resources(&runtime, format),
        Commands::Demo(_) | Commands::Completions(_) => Ok(()),
    };
    // Shutdown drains every coordinator's inbox, so accepted signals are recorded
    runtime.shutdown().await;
    result
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
