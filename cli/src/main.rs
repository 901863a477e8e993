//! referenda: run a chain snapshot through the aggregation graph and print
//! what a wallet would show.

mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use referenda_service::{
    init_logging, AggregationGraph, AverageBlockTime, ChainSnapshot, GovernanceSnapshot,
    ServiceConfig, ShutdownController,
};
use referenda_types::{Address, ReferendumId};

#[derive(Parser)]
#[command(name = "referenda", about = "Governance lock and claim accounting")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "REFERENDA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "REFERENDA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "REFERENDA_LOG_FORMAT")]
    log_format: Option<String>,

    /// Average block time in milliseconds, used for unlock ETAs.
    #[arg(long, env = "REFERENDA_BLOCK_TIME_MS")]
    block_time_ms: Option<u64>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Claim schedule per address, with unlock ETAs.
    Schedule {
        #[arg(long)]
        snapshot: PathBuf,
        /// Only this address.
        #[arg(long)]
        address: Option<String>,
    },
    /// Largest lock per address and the wallet total.
    Locks {
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// Delegations grouped by target.
    Delegations {
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// Decoupled votes and decision totals of one referendum.
    Votes {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        referendum: u32,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(cli: &Cli) -> anyhow::Result<ServiceConfig> {
    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    if let Some(block_time_ms) = cli.block_time_ms {
        anyhow::ensure!(block_time_ms > 0, "--block-time-ms must be positive");
        config.block_time_ms = block_time_ms;
    }
    Ok(config)
}

/// Feed `path` into a fresh graph and wait for its first snapshot.
async fn evaluate(config: &ServiceConfig, path: &Path) -> anyhow::Result<Arc<GovernanceSnapshot>> {
    let chain = ChainSnapshot::from_json_file(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    if chain.chain != config.chain {
        tracing::warn!(snapshot = %chain.chain, configured = %config.chain, "snapshot is for another chain");
    }
    tracing::info!(
        chain = %chain.chain,
        block = %chain.current_block,
        referenda = chain.referenda.len(),
        records = chain.records.len(),
        "loaded snapshot"
    );

    let shutdown = ShutdownController::new();
    let (graph, feed) = AggregationGraph::new(chain.chain.clone());
    let mut snapshots = graph.subscribe();
    let handle = graph.spawn(shutdown.subscribe());

    chain.publish(&feed, config.constants())?;

    let snapshot = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            snapshots
                .changed()
                .await
                .context("aggregation graph stopped before publishing")?;
            if let Some(snapshot) = snapshots.borrow_and_update().clone() {
                return anyhow::Ok(snapshot);
            }
        }
    })
    .await
    .context("timed out waiting for the aggregation graph")??;

    shutdown.shutdown();
    handle.await.context("aggregation graph panicked")?;
    Ok(snapshot)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format()?, &config.log_level)?;

    let oracle = AverageBlockTime::new(config.block_time());
    let output = match &cli.command {
        Command::Config => config.to_toml_string()?,
        Command::Schedule { snapshot, address } => {
            let address = address.as_deref().map(Address::parse).transpose()?;
            let governance = evaluate(&config, snapshot).await?;
            render::schedule(&governance, address.as_ref(), &oracle, cli.json)?
        }
        Command::Locks { snapshot } => {
            let governance = evaluate(&config, snapshot).await?;
            render::locks(&governance, cli.json)?
        }
        Command::Delegations { snapshot } => {
            let governance = evaluate(&config, snapshot).await?;
            render::delegations(&governance, cli.json)?
        }
        Command::Votes {
            snapshot,
            referendum,
        } => {
            let governance = evaluate(&config, snapshot).await?;
            render::votes(&governance, ReferendumId::new(*referendum), cli.json)?
        }
    };
    println!("{output}");
    Ok(())
}
