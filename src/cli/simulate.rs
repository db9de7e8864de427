//! Simulate command implementation.

use super::output::{StoreSummary, format_summary};
use super::{CliError, OutputFormat};
use colonia::save::save_units;
use colonia::sim::{SimulationConfig, run_simulation};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct JsonSimulation {
    seed: u64,
    config: SimulationConfig,
    transitions: u32,
    skipped: u32,
    summary: StoreSummary,
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the config is unusable or the save cannot be written.
pub(crate) fn execute(
    seed: Option<u64>,
    steps: Option<u32>,
    config_path: Option<PathBuf>,
    save: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let mut config = match &config_path {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(steps) = steps {
        config.steps = steps;
    }

    // Generate seed if not provided
    #[allow(clippy::cast_possible_truncation)]
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    });

    let result = run_simulation(seed, &config)?;

    if let Some(save_path) = &save {
        save_units(&result.units, save_path)?;
    }

    let summary = StoreSummary::from_units(&result.units);
    match format {
        OutputFormat::Text => {
            println!("Simulation (seed: {seed})");
            println!("  Transitions: {} applied, {} skipped", result.transitions, result.skipped);
            println!();
            print!("{}", format_summary(&summary));
            if let Some(save_path) = &save {
                println!();
                println!("Store saved to: {}", save_path.display());
            }
        }
        OutputFormat::Json => {
            let json = JsonSimulation {
                seed,
                config,
                transitions: result.transitions,
                skipped: result.skipped,
                summary,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
