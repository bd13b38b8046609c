//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "fleetsim")]
#[command(version)]
#[command(about = "Simulated fleet-tracking dashboard")]
#[command(long_about = None)]
pub struct Cli {
    /// Config file (defaults to <config dir>/fleetsim/config.json)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Override the number of vehicles
    #[arg(long, short = 'n')]
    pub fleet_size: Option<usize>,

    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the tick interval in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Stop after this many ticks (runs until Ctrl-C when omitted)
    #[arg(long, short = 't')]
    pub ticks: Option<u64>,

    /// Only show vehicles whose name or driver matches
    #[arg(long, short = 's', default_value = "")]
    pub search: String,

    /// Request a fleet summary when the run ends
    #[arg(long)]
    pub summarize: bool,

    /// Request a health analysis of this vehicle id when the run ends
    #[arg(long)]
    pub analyze: Option<String>,
}
