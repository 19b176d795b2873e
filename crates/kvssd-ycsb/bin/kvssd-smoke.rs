//! KV-SSD smoke driver.
//!
//! Replays the two-key row scenario against an emulated device and, with
//! `--keys`, a bulk run over generated rows. Exits non-zero if any step
//! deviates from the expected outcome.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kvssd::{Backend, KvssdConfig};
use kvssd_ycsb::{DynRowStore, smoke};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "kvssd-smoke",
    about = "Smoke test for the KV-SSD row binding",
    version
)]
struct Args {
    /// Device backend (hashmap, sharded)
    #[arg(long, env = "KVSSD_BACKEND")]
    backend: Option<Backend>,

    /// Shard amount for the sharded backend
    #[arg(long, env = "KVSSD_SHARD_AMOUNT")]
    shard_amount: Option<usize>,

    /// Number of generated rows for the bulk run (0 skips it)
    #[arg(long, default_value_t = 0)]
    keys: usize,

    /// JSON device configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn device_config(&self) -> Result<KvssdConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse {}", path.display()))?
            }
            None => KvssdConfig::default(),
        };

        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(shard_amount) = self.shard_amount {
            config.shard_amount = shard_amount;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.device_config()?;

    tracing::info!(
        "Smoke test started: backend={}, shard_amount={}",
        config.backend,
        config.shard_amount
    );

    let store = DynRowStore::open(&config)?;
    let report = smoke::run_literal(&store).context("Literal scenario failed")?;
    tracing::info!(
        "Literal scenario passed: {} operations, {} expected failures",
        report.operations,
        report.expected_failures
    );

    if args.keys > 0 {
        let store = DynRowStore::open(&config)?;
        let report = smoke::run_bulk(&store, args.keys).context("Bulk run failed")?;
        tracing::info!(
            "Bulk run passed: {} rows, {} operations",
            args.keys,
            report.operations
        );
    }

    tracing::info!("Smoke test ended");
    Ok(())
}
