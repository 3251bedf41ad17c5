//! Backend configuration tool.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ loader ──▶ defaults ──▶ BackendConfig ──┐
//!        ▲                                                  │
//!        │ notify                                           ▼
//!     watcher ──▶ new BackendConfig ──▶ diff (vs active) ──▶ GatewayChanges
//!                                          │                    │
//!                                          ▼                    ▼
//!                                   ActiveConfig swap     reconciler / logs
//! ```
//!
//! # Commands
//! - `diff` prints the gateways affected by moving from one file to another
//! - `defaults` prints a file with defaults applied
//! - `chain` prints a chain in execution order
//! - `watch` keeps a file loaded and logs the affected gateways on each change

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use backend_config::config::loader::load_config;
use backend_config::config::watcher::ConfigWatcher;
use backend_config::observability::{logging, metrics};
use backend_config::{ActiveConfig, StackConfig};

#[derive(Parser)]
#[command(name = "backend-config")]
#[command(about = "Inspect and hot-reload gateway backend configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show gateways affected by replacing OLD with NEW
    Diff {
        #[arg(long)]
        old: PathBuf,
        #[arg(long)]
        new: PathBuf,
    },
    /// Print a configuration with defaults applied
    Defaults {
        path: PathBuf,
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Print a chain in execution order
    Chain {
        chain: String,
        /// Treat the chain as a stream processor chain
        #[arg(long)]
        stream: bool,
    },
    /// Watch a configuration file and report affected gateways on change
    Watch {
        path: PathBuf,
        /// Expose Prometheus metrics on this address
        #[arg(long)]
        metrics_address: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(logging::DEFAULT_FILTER);
    let cli = Cli::parse();

    match cli.command {
        Commands::Diff { old, new } => {
            let old = load_config(&old)?;
            let new = load_config(&new)?;
            let changes = new.changes(&old);
            println!("{}", serde_json::to_string_pretty(&changes)?);
        }
        Commands::Defaults { path, json } => {
            let config = load_config(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
        Commands::Chain { chain, stream } => {
            let stack = if stream {
                StackConfig::stream_processors(&chain)
            } else {
                StackConfig::processors(&chain)
            };
            println!("{}", stack);
        }
        Commands::Watch { path, metrics_address } => {
            if let Some(addr) = metrics_address {
                metrics::init_metrics(addr);
            }
            watch(path).await?;
        }
    }

    Ok(())
}

async fn watch(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let initial = load_config(&path)?;
    let (watcher, mut updates) = ConfigWatcher::new(&path, initial.clone());
    let active = ActiveConfig::new(initial);

    // Keep the watcher alive for the lifetime of the loop
    let _watcher = watcher.run()?;

    loop {
        tokio::select! {
            Some(new_config) = updates.recv() => {
                let changes = active.apply(new_config);
                if changes.is_empty() {
                    continue;
                }
                let current = active.load();
                for name in changes.changed.iter().chain(&changes.added) {
                    match current.gateway_config(name) {
                        Ok(gateway) => tracing::info!(
                            gateway = %name,
                            save_process = %gateway.save_process,
                            save_workers_size = gateway.save_workers_size,
                            "Gateway needs reconfiguration"
                        ),
                        Err(e) => tracing::warn!(gateway = %name, error = %e, "Gateway settings unreadable"),
                    }
                }
                println!("{}", serde_json::to_string(&changes)?);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received, stopping watcher");
                break;
            }
        }
    }

    Ok(())
}
