pub mod preview;
pub mod reconcile;
pub mod summarize;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::config::AppConfig;

/// Reads and parses a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

pub fn show_config(config: &AppConfig) -> Result<()> {
    let mut shown = config.clone();
    if shown.store.http.api_token.is_some() {
        shown.store.http.api_token = Some("********".into());
    }
    let rendered = toml::to_string_pretty(&shown).context("Failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}
