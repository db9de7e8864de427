//! Snapshot validation command implementation.

use super::CliError;
use colonia::save;
use colonia::units;
use std::path::Path;

/// Execute the validate command.
///
/// Reports every broken invariant, not just the first.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the snapshot is corrupt.
pub(crate) fn execute(path: &Path) -> Result<(), CliError> {
    let wrapped = save::read_snapshot(path)?;

    println!("Validating: {}", path.display());
    println!();

    let violations = units::check_invariants(&wrapped);
    print_check("Parsed snapshot", true);
    print_check("Store invariants", violations.is_empty());
    if !violations.is_empty() {
        println!();
        for violation in &violations {
            println!("  - {violation}");
        }
        return Err(CliError::new(format!(
            "corrupt save: {} invariant violation(s)",
            violations.len()
        )));
    }

    println!();
    println!("Summary:");
    println!("  Units:          {}", wrapped.units.len());
    println!("  Ordering:       {} entries", wrapped.unit_ordering.len());
    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
