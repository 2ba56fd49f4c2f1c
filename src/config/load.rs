use crate::config::types::RawOptions;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load options from a JSON config file. Keys are not validated beyond their types.
pub fn load_options(path: &Path) -> Result<RawOptions> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))
}

/// Load options from `path` when given, otherwise use the defaults.
pub fn load_options_or_default(path: Option<&Path>) -> Result<RawOptions> {
    path.map_or_else(|| Ok(RawOptions::default()), load_options)
}
