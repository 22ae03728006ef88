//! Command-line runner for the Flotilla flocking and combat simulation.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "flotilla",
    about = "Flotilla: team-based flocking and dogfight simulation",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation headless and print a per-team summary
    Simulate {
        /// JSON configuration file (default: built-in two-team setup)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,

        /// Seconds per tick
        #[arg(long, default_value = "0.0333")]
        dt: f32,

        /// RNG seed, overriding the configuration
        #[arg(short, long)]
        seed: Option<u64>,

        /// Slots per team, overriding the configuration
        #[arg(long)]
        capacity: Option<usize>,

        /// Print the event stream and info logs
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the default configuration as JSON
    Config,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            config,
            ticks,
            dt,
            seed,
            capacity,
            verbose,
        } => {
            logging::init(verbose);
            commands::simulate::run(&commands::simulate::Options {
                config: config.as_deref(),
                ticks,
                dt,
                seed,
                capacity,
                verbose,
            })
        }
        Commands::Config => commands::config::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
