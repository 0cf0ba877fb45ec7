use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_chase_core::Tuning;

/// Loads tuning from a TOML file, or the defaults when no path is given.
pub(crate) fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning at {}", path.display()))?;
    parse_tuning(&contents).with_context(|| format!("invalid tuning in {}", path.display()))
}

fn parse_tuning(contents: &str) -> Result<Tuning> {
    let tuning: Tuning = toml::from_str(contents).context("failed to parse tuning toml contents")?;
    tuning.validate()?;
    Ok(tuning)
}
