//! Print the effective configuration

use anyhow::{Context, Result};

pub fn run(config: Option<&str>) -> Result<()> {
    let settings = super::load_settings(config)?;
    let toml = settings
        .to_toml_string()
        .context("Failed to serialize config")?;
    print!("{}", toml);
    Ok(())
}
