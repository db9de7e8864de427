//! Colonia CLI - inspect, validate and exercise units snapshots.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Colonia - unit ownership store for a colonial strategy game
#[derive(Parser, Debug)]
#[command(name = "colonia")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a units snapshot against every store invariant
    Validate {
        /// Snapshot file (JSON)
        #[arg(required = true)]
        save: std::path::PathBuf,
    },

    /// Summarize a units snapshot
    Inspect {
        /// Snapshot file (JSON)
        #[arg(required = true)]
        save: std::path::PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Also list the units on tile X,Y (and their cargo)
        #[arg(long, value_parser = cli::parse_coord)]
        at: Option<colonia::Coord>,
    },

    /// Run a deterministic random simulation of unit transitions
    Simulate {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Transitions to attempt (overrides the config file)
        #[arg(short = 'n', long)]
        steps: Option<u32>,

        /// Simulation config (JSON); missing fields take defaults
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Save the final store to a file
        #[arg(long)]
        save: Option<std::path::PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Validate { save } => cli::validate::execute(&save),

        Commands::Inspect { save, format, at } => cli::inspect::execute(&save, format, at),

        Commands::Simulate {
            seed,
            steps,
            config,
            save,
            format,
        } => cli::simulate::execute(seed, steps, config, save, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
