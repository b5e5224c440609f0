//! Brains - Entry Point
//!
//! Loads the arena configuration, wipes the snapshot store, spawns the
//! initial population and runs the simulation until Ctrl-C.

use brains::core::config::ArenaConfig;
use brains::core::error::Result;
use brains::decision::HttpDecisionClient;
use brains::persistence::DirectoryStore;
use brains::simulation::Simulation;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Zombie arena simulation
#[derive(Parser, Debug)]
#[command(name = "brains")]
#[command(about = "Run the zombie arena and write per-tick snapshots for the renderer")]
struct Args {
    /// TOML configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Decision service URL for human-controlled actors
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory that receives actor snapshots
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Number of zombies to spawn
    #[arg(long)]
    zombies: Option<usize>,

    /// Names of human-controlled actors (repeatable)
    #[arg(long = "human")]
    humans: Vec<String>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,
}

impl Args {
    fn into_config(self) -> Result<ArenaConfig> {
        let mut config = match &self.config {
            Some(path) => ArenaConfig::load(path)?,
            None => ArenaConfig::new(),
        };

        if let Some(endpoint) = self.endpoint {
            config.decision.endpoint = endpoint;
        }
        if let Some(dir) = self.store_dir {
            config.store.directory = dir;
        }
        if let Some(zombies) = self.zombies {
            config.population.zombie_count = zombies;
        }
        if !self.humans.is_empty() {
            config.population.human_names = self.humans;
        }
        if self.seed.is_some() {
            config.world.seed = self.seed;
        }
        if self.max_ticks.is_some() {
            config.ticks.max_ticks = self.max_ticks;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("brains=info")),
        )
        .init();

    let config = Args::parse().into_config()?;
    tracing::info!("Brains starting...");

    let rt = Runtime::new()?;
    let _runtime = rt.enter();

    let store = DirectoryStore::open(&config.store.directory)?;
    tracing::info!("Writing snapshots to {}", store.root().display());

    let decisions = Arc::new(HttpDecisionClient::from_config(&config.decision)?);
    tracing::info!("Human actors decide via {}", decisions.endpoint());

    let simulation = Simulation::start(&config, store, decisions)?;

    rt.block_on(simulation.run(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }));

    Ok(())
}
