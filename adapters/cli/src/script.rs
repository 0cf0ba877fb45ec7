use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use maze_chase_core::Direction;

/// Action taken by the scripted input source at a given tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScriptAction {
    /// Steer the player in a direction until the next steer.
    Steer(Direction),
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}

/// Tick-indexed input read from `tick:action` pairs separated by commas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Script {
    actions: BTreeMap<u64, ScriptAction>,
}

impl Script {
    /// Parses a script such as `0:left,90:up,300:pause,360:resume`.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let mut actions = BTreeMap::new();
        for entry in text.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let Some((tick, action)) = entry.split_once(':') else {
                bail!("script entry `{entry}` is not of the form tick:action");
            };
            let tick: u64 = tick
                .trim()
                .parse()
                .with_context(|| format!("invalid tick in script entry `{entry}`"))?;
            let action = parse_action(action.trim())
                .with_context(|| format!("invalid action in script entry `{entry}`"))?;
            if actions.insert(tick, action).is_some() {
                bail!("script schedules tick {tick} twice");
            }
        }
        Ok(Self { actions })
    }

    /// Action scheduled for `tick`, if any.
    pub(crate) fn action_at(&self, tick: u64) -> Option<ScriptAction> {
        self.actions.get(&tick).copied()
    }
}

fn parse_action(action: &str) -> Result<ScriptAction> {
    match action {
        "pause" => Ok(ScriptAction::Pause),
        "resume" => Ok(ScriptAction::Resume),
        other => match Direction::from_name(other) {
            Some(direction) => Ok(ScriptAction::Steer(direction)),
            None => bail!("unknown action `{other}`"),
        },
    }
}
