//! CLI command implementations

pub mod config;
pub mod render;
pub mod sprite;

use anyhow::{Context, Result};
use pinkboard_core::Settings;
use std::path::Path;

/// Layered settings, with an explicit `--config` path taking the file slot
pub fn load_settings(path: Option<&str>) -> Result<Settings> {
    Settings::load(path.map(Path::new)).with_context(|| match path {
        Some(path) => format!("Failed to load config from {}", path),
        None => "Failed to load config".to_string(),
    })
}
