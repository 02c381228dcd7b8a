//! Ember CLI - Simulate and inspect particle system configurations

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{inspect, simulate, template};
use ember_particles::DepthSortMode;

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Headless tooling for 2D particle system configurations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a configuration headless and report what it did
    Simulate {
        /// Path to the particle system TOML file
        config: String,

        /// Number of frames to run
        #[arg(long, default_value = "600")]
        frames: u32,

        /// Milliseconds per frame
        #[arg(long, default_value = "16")]
        step_ms: u32,

        /// Particle RNG seed
        #[arg(long)]
        seed: Option<u32>,

        /// Depth mode (individual, layerable, owner)
        #[arg(long, default_value = "individual", value_parser = parse_sort_mode)]
        mode: DepthSortMode,

        /// Emitter rotation in degrees
        #[arg(long, default_value = "0")]
        angle: f32,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show derived properties of a configuration
    Inspect {
        /// Path to the particle system TOML file
        config: String,
    },

    /// Print the default configuration as TOML
    Template,
}

fn parse_sort_mode(s: &str) -> Result<DepthSortMode, String> {
    match s {
        "individual" => Ok(DepthSortMode::IndividualOffset),
        "layerable" => Ok(DepthSortMode::Layerable),
        "owner" => Ok(DepthSortMode::SameDepthAsOwner),
        _ => Err(format!(
            "unknown depth mode '{}'; valid values: individual, layerable, owner",
            s
        )),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            frames,
            step_ms,
            seed,
            mode,
            angle,
            json,
        } => simulate::run(simulate::SimulateArgs {
            config,
            frames,
            step_ms,
            seed,
            mode,
            angle,
            json,
        }),
        Commands::Inspect { config } => inspect::run(&config),
        Commands::Template => template::run(),
    }
}
