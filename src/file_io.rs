use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Read and parse a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

/// Write pretty JSON to `out`, or to stdout when no path is given
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    match out {
        Some(path) => {
            fs::write(path, content + "\n")
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
        None => println!("{content}"),
    }
    Ok(())
}
