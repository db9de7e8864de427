//! Snapshot inspection command implementation.

use super::output::{StoreSummary, TileUnit, format_summary, format_tile, tile_listing};
use super::{CliError, OutputFormat};
use colonia::Coord;
use colonia::save;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct JsonInspect {
    summary: StoreSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    tile: Option<JsonTile>,
}

#[derive(Debug, Serialize)]
struct JsonTile {
    coord: Coord,
    units: Vec<TileUnit>,
}

/// Execute the inspect command.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded.
pub(crate) fn execute(path: &Path, format: OutputFormat, at: Option<Coord>) -> Result<(), CliError> {
    let units = save::load_units(path)?;
    let summary = StoreSummary::from_units(&units);
    let tile = at.map(|coord| (coord, tile_listing(&units, coord)));

    match format {
        OutputFormat::Text => {
            print!("{}", format_summary(&summary));
            if let Some((coord, listing)) = &tile {
                println!();
                print!("{}", format_tile(*coord, listing));
            }
        }
        OutputFormat::Json => {
            let json = JsonInspect {
                summary,
                tile: tile.map(|(coord, units)| JsonTile { coord, units }),
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
