use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Drives a self-tuning predictive controller against a simulated ARX
/// process and records how output, action and model evolve tick by tick.
#[derive(Parser)]
#[command(
    name = "apc",
    version,
    about = "Run an adaptive predictive controller against a simulated ARX process"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Close the loop for a number of ticks and write a JSON trace.
    Simulate(SimulateArgs),
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args)]
pub struct SimulateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "apc.toml")]
    pub config: PathBuf,

    /// Override output JSON trace path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Override the number of ticks from config.
    #[arg(short, long)]
    pub ticks: Option<usize>,
}
