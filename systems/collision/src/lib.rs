#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player/ghost contact detection.

use maze_chase_core::{Command, GhostMode, GhostView, PlayerSnapshot};

/// Pure system that turns player/ghost contact into eat or life-loss commands.
#[derive(Debug, Default)]
pub struct Collision;

impl Collision {
    /// Creates a new collision system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Inspects every released ghost sharing the player's cell.
    ///
    /// Frightened ghosts are eaten in identifier order. Contact with a
    /// scattering or chasing ghost costs a single life no matter how many
    /// such ghosts overlap the player.
    pub fn handle(&self, player: &PlayerSnapshot, ghost_view: &GhostView, out: &mut Vec<Command>) {
        let mut caught = false;
        for ghost in ghost_view
            .iter()
            .filter(|ghost| !ghost.in_house && ghost.cell == player.cell)
        {
            match ghost.mode {
                GhostMode::Frightened => out.push(Command::EatGhost { ghost: ghost.id }),
                GhostMode::Scatter | GhostMode::Chase => caught = true,
                GhostMode::Eaten => {}
            }
        }

        if caught {
            out.push(Command::LoseLife);
        }
    }
}
