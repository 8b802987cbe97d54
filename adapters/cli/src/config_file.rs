//! Loading of session configuration files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_chase_core::GameConfig;

/// Reads a TOML configuration file; omitted fields keep the classic defaults.
pub(crate) fn load(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid configuration in {}", path.display()))
}

fn parse(contents: &str) -> Result<GameConfig> {
    let config: GameConfig =
        toml::from_str(contents).context("failed to parse configuration toml contents")?;
    config.validate()?;
    Ok(config)
}
