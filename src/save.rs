//! Reading and writing units snapshots.
//!
//! Only the wrapped state is written. Loading validates the snapshot
//! before any index is built, and a snapshot that fails validation is
//! refused outright rather than repaired.

use crate::error::SaveError;
use crate::units::{UnitsState, WrappedUnitsState};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write the store's snapshot to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_units(units: &UnitsState, path: &Path) -> Result<(), SaveError> {
    let io_err = |source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, units.wrapped()).map_err(SaveError::Encode)?;
    writer.flush().map_err(io_err)?;
    log::info!("saved {} units to {}", units.all().len(), path.display());
    Ok(())
}

/// Read a snapshot from `path` without validating it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a snapshot.
pub fn read_snapshot(path: &Path) -> Result<WrappedUnitsState, SaveError> {
    let file = File::open(path).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| SaveError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate a snapshot, rebuilding the store's indices.
///
/// # Errors
///
/// Returns [`SaveError::Corrupt`] if the snapshot breaks an invariant,
/// or an I/O or parse error.
pub fn load_units(path: &Path) -> Result<UnitsState, SaveError> {
    let wrapped = read_snapshot(path)?;
    let units = UnitsState::try_from(wrapped)?;
    log::info!("loaded {} units from {}", units.all().len(), path.display());
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Coord, Unit, UnitComposition};
    use tempfile::NamedTempFile;

    #[test]
    fn test_save_load_roundtrip() {
        let mut units = UnitsState::new();
        let id = units.add_unit(Unit::new(UnitComposition::soldier()));
        units.to_map(id, Coord::new(5, 6));

        let temp_file = NamedTempFile::new().expect("create temp file");
        save_units(&units, temp_file.path()).expect("save units");
        let loaded = load_units(temp_file.path()).expect("load units");

        assert_eq!(loaded, units);
        assert_eq!(loaded.coord_for(id), Coord::new(5, 6));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = load_units(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SaveError::Io { .. }));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let temp_file = NamedTempFile::new().expect("create temp file");
        std::fs::write(temp_file.path(), "{ not json").expect("write");
        let err = load_units(temp_file.path()).unwrap_err();
        assert!(matches!(err, SaveError::Parse { .. }));
    }
}
