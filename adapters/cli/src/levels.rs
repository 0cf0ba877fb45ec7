use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use maze_chase_core::{LayoutError, LayoutProvider, LayoutTemplate};

const CLASSIC: &str = include_str!("../levels/classic.txt");

/// Layouts played in order, starting over after the last one.
#[derive(Clone, Debug)]
pub(crate) struct LevelSet {
    layouts: Vec<LayoutTemplate>,
}

impl LevelSet {
    /// The built-in 28x31 maze.
    pub(crate) fn classic() -> Result<Self> {
        let layout = LayoutTemplate::parse(CLASSIC).context("built-in layout is malformed")?;
        Ok(Self {
            layouts: vec![layout],
        })
    }

    /// Reads and parses every layout file.
    pub(crate) fn from_paths(paths: &[PathBuf]) -> Result<Self> {
        let layouts = paths
            .iter()
            .map(|path| {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read layout at {}", path.display()))?;
                LayoutTemplate::parse(&contents)
                    .with_context(|| format!("failed to parse layout at {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { layouts })
    }
}

impl LayoutProvider for LevelSet {
    fn layout(&self, level: u32) -> Result<LayoutTemplate, LayoutError> {
        if self.layouts.is_empty() {
            return Err(LayoutError::Empty);
        }
        let index = usize::try_from(level.saturating_sub(1)).unwrap_or(0) % self.layouts.len();
        Ok(self.layouts[index].clone())
    }
}
