use anyhow::{Context, Result};

/// A top-level array of arrays of numbers.
pub fn parse_json(content: &str) -> Result<Vec<Vec<f64>>> {
    serde_json::from_str(content).context("expected a JSON array of numeric arrays")
}
