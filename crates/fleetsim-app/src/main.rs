//! FleetSim - headless fleet-tracking dashboard
//!
//! Builds a simulated fleet, advances it on a fixed cadence and prints a
//! live status board. Optionally asks the text-generation backend for a
//! fleet summary or a vehicle health analysis when the run ends.

mod board;
mod cli;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fleetsim_core::config::FleetConfig;
use fleetsim_core::driver::FleetDriver;
use fleetsim_core::fleet::Fleet;
use fleetsim_core::routes::RouteTable;
use fleetsim_core::simulation::FleetSimulator;
use fleetsim_core::summarizer::FleetSummarizer;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let routes = RouteTable::san_francisco();
    let mut simulator = match config.seed {
        Some(seed) => FleetSimulator::with_seed(routes, seed),
        None => FleetSimulator::new(routes),
    };
    let fleet = simulator.build_initial_fleet(config.fleet_size);
    let mut driver = FleetDriver::spawn(simulator, fleet, config.tick_interval());
    let mut updates = driver.subscribe();

    println!("{}", board::render(&driver.current(), &cli.search, 0));

    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
        }
    };
    follow_board(&mut updates, &cli.search, cli.ticks, interrupted).await;

    driver.stop();
    let fleet = driver.current();

    if cli.summarize || cli.analyze.is_some() {
        let summarizer = FleetSummarizer::from_config(&config.summarizer);

        if let Some(id) = &cli.analyze {
            match fleet.get(id) {
                Some(vehicle) => {
                    println!("== Vehicle analysis: {} ==", vehicle.name);
                    println!("{}", summarizer.analyze_vehicle(vehicle).await);
                }
                None => eprintln!("No vehicle with id '{}'", id),
            }
        }

        if cli.summarize {
            println!("== Fleet intelligence ==");
            println!("{}", summarizer.summarize_fleet(&fleet).await);
        }
    }

    Ok(())
}

/// Print the board for every published tick until `limit` ticks, driver
/// shutdown or `shutdown` resolving. Returns the number of ticks shown.
async fn follow_board(
    updates: &mut watch::Receiver<Arc<Fleet>>,
    search: &str,
    limit: Option<u64>,
    shutdown: impl Future<Output = ()>,
) -> u64 {
    tokio::pin!(shutdown);

    let mut tick: u64 = 0;
    loop {
        if limit.is_some_and(|limit| tick >= limit) {
            break;
        }
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                tick += 1;
                let fleet = updates.borrow_and_update().clone();
                println!("{}", board::render(&fleet, search, tick));
            }
            _ = &mut shutdown => break,
        }
    }
    tick
}

/// Config file (explicit or default location) with command line overrides applied
fn load_config(cli: &Cli) -> Result<FleetConfig> {
    let mut config = match &cli.config {
        Some(path) => FleetConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let path: PathBuf = FleetConfig::default_path().context("Locating config directory")?;
            FleetConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
    };

    if let Some(n) = cli.fleet_size {
        config.fleet_size = n;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(ms) = cli.interval_ms {
        config.tick_interval_ms = ms;
    }
    config.validate().context("Invalid configuration")?;

    info!(
        fleet_size = config.fleet_size,
        interval_ms = config.tick_interval_ms,
        seeded = config.seed.is_some(),
        "Configuration loaded"
    );
    Ok(config)
}
