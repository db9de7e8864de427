//! CLI command implementations for Colonia.

pub(crate) mod inspect;
pub(crate) mod simulate;
pub(crate) mod validate;

mod output;

use clap::ValueEnum;
use colonia::Coord;
use std::error::Error;
use std::fmt;

/// Output format for `inspect` and `simulate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<colonia::SaveError> for CliError {
    fn from(e: colonia::SaveError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<colonia::ConfigError> for CliError {
    fn from(e: colonia::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("failed to encode output: {e}"))
    }
}

/// Parse a tile given as `X,Y`.
pub(crate) fn parse_coord(s: &str) -> Result<Coord, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got `{s}`"))?;
    let x = x.trim().parse::<u16>().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y = y.trim().parse::<u16>().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok(Coord::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coord() {
        assert_eq!(parse_coord("3,4"), Ok(Coord::new(3, 4)));
        assert_eq!(parse_coord(" 10 , 0 "), Ok(Coord::new(10, 0)));
        assert!(parse_coord("3").is_err());
        assert!(parse_coord("3,-1").is_err());
        assert!(parse_coord("x,1").is_err());
    }
}
