#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Host-owned simulation context that threads fixed ticks through the world and systems.

mod clock;

use std::time::Duration;

use log::{debug, info, warn};
use maze_chase_core::{
    Command, Direction, Event, GhostTarget, LayoutError, LayoutProvider, PlayMode, Tuning,
    TuningError, WorldSnapshot,
};
use maze_chase_system_collision::Collision;
use maze_chase_system_mode_scheduler::ModeScheduler;
use maze_chase_system_movement::Movement;
use maze_chase_system_scoring::{self as scoring, Scoring};
use maze_chase_system_targeting::{self as targeting, Targeting};
use maze_chase_world::{self as world, query, Maze, Status, World};
use thiserror::Error;

pub use self::clock::{FixedStep, MAX_CATCH_UP_TICKS};

/// Failures surfaced while driving the simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The tuning cannot drive a simulation.
    #[error("invalid tuning")]
    Tuning(#[from] TuningError),
    /// The layout provider could not supply a level.
    #[error("failed to load the layout for level {level}")]
    Layout {
        /// Level that was requested.
        level: u32,
        /// Provider failure.
        #[source]
        source: LayoutError,
    },
}

/// World plus systems, advanced one fixed tick at a time.
#[derive(Debug)]
pub struct Simulation<P> {
    provider: P,
    world: World,
    scheduler: ModeScheduler,
    targeting: Targeting,
    movement: Movement,
    collision: Collision,
    scoring: Scoring,
    clock: FixedStep,
    events: Vec<Event>,
    commands: Vec<Command>,
    targets: Vec<GhostTarget>,
}

impl<P> Simulation<P>
where
    P: LayoutProvider,
{
    /// Validates `tuning`, builds the systems and loads level one from `provider`.
    pub fn new(tuning: Tuning, provider: P) -> Result<Self, SimulationError> {
        tuning.validate()?;

        let mut simulation = Self {
            provider,
            scheduler: ModeScheduler::new(tuning.scatter_duration(), tuning.chase_duration()),
            targeting: Targeting::new(targeting::Config::new(
                tuning.ambusher_lookahead,
                tuning.opportunist_radius,
            )),
            movement: Movement::new(tuning.rng_seed),
            collision: Collision::new(),
            scoring: Scoring::new(scoring::Config::from(&tuning)),
            clock: FixedStep::new(tuning.tick_duration()),
            world: World::new(tuning),
            events: Vec::new(),
            commands: Vec::new(),
            targets: Vec::new(),
        };
        simulation.load_level(1)?;
        Ok(simulation)
    }

    /// Length of one fixed tick.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        self.clock.tick()
    }

    /// Events produced by the most recent step, or by the initial level load.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Maze of the current level.
    #[must_use]
    pub fn maze(&self) -> &Maze {
        query::maze(&self.world)
    }

    /// Score accumulated so far.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.scoring.score()
    }

    /// Reports whether the game has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::status(&self.world) == Status::GameOver
    }

    /// Captures everything an observer needs to draw the current state.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            player: query::player(&self.world),
            ghosts: query::ghost_view(&self.world).into_vec(),
            power: query::power_mode(&self.world),
            fruit: query::fruit(&self.world),
            phase: query::global_phase(&self.world),
            play_mode: query::play_mode(&self.world),
            level: query::level(&self.world),
            lives: query::lives(&self.world),
            score: self.scoring.score(),
            dots_remaining: query::maze(&self.world).dots_remaining(),
        }
    }

    /// Pauses or resumes the simulation.
    ///
    /// Resuming discards frame time that piled up while paused.
    pub fn set_paused(&mut self, paused: bool) -> &[Event] {
        self.events.clear();
        let mode = if paused {
            PlayMode::Paused
        } else {
            PlayMode::Running
        };
        world::apply(&mut self.world, Command::SetPlayMode { mode }, &mut self.events);
        if !paused {
            self.clock.reset();
        }
        &self.events
    }

    /// Converts `frame_dt` into fixed ticks and runs them, returning every event.
    pub fn advance(
        &mut self,
        frame_dt: Duration,
        desired: Option<Direction>,
    ) -> Result<Vec<Event>, SimulationError> {
        if query::play_mode(&self.world) == PlayMode::Paused {
            return Ok(Vec::new());
        }

        let before = self.clock.pending().saturating_add(frame_dt);
        let ticks = self.clock.accumulate(frame_dt);
        if ticks == MAX_CATCH_UP_TICKS {
            let used = self.clock.tick() * ticks;
            if before > used {
                warn!("simulation fell behind, dropping {:?}", before - used);
            }
        }

        let mut collected = Vec::new();
        for _ in 0..ticks {
            collected.extend_from_slice(self.step(desired)?);
        }
        Ok(collected)
    }

    /// Runs exactly one fixed tick with `desired` as the player's input.
    pub fn step(&mut self, desired: Option<Direction>) -> Result<&[Event], SimulationError> {
        self.events.clear();
        if query::status(&self.world) != Status::Playing
            || query::play_mode(&self.world) == PlayMode::Paused
        {
            return Ok(&self.events);
        }

        if let Some(direction) = desired {
            self.commands
                .push(Command::QueuePlayerDirection { direction });
        }
        self.commands.push(Command::Tick {
            dt: self.clock.tick(),
        });
        self.apply_pending();

        self.movement.handle_player(
            &query::player(&self.world),
            query::maze(&self.world),
            &mut self.commands,
        );
        self.apply_pending();

        let scheduled = self.events.len();
        self.scheduler.handle(&self.events, &mut self.commands);
        self.apply_pending();

        let ghost_view = query::ghost_view(&self.world);
        self.targets.clear();
        self.targeting.handle(
            &ghost_view,
            &query::player(&self.world),
            query::maze(&self.world).house_entrance(),
            &mut self.targets,
        );
        self.movement.handle_ghosts(
            &ghost_view,
            &self.targets,
            query::maze(&self.world),
            &mut self.commands,
        );
        self.apply_pending();

        self.collision.handle(
            &query::player(&self.world),
            &query::ghost_view(&self.world),
            &mut self.commands,
        );
        self.apply_pending();

        self.scheduler
            .handle(&self.events[scheduled..], &mut self.commands);
        self.apply_pending();

        self.scoring.handle(&self.events, &mut self.commands);
        self.apply_pending();

        if query::status(&self.world) == Status::LevelCleared {
            let next = query::level(&self.world).saturating_add(1);
            self.load_level(next)?;
        }

        debug!(
            "tick {} produced {} events",
            query::tick_index(&self.world),
            self.events.len()
        );
        Ok(&self.events)
    }

    fn load_level(&mut self, level: u32) -> Result<(), SimulationError> {
        let layout = self
            .provider
            .layout(level)
            .map_err(|source| SimulationError::Layout { level, source })?;
        info!("loading level {level}");

        let start = self.events.len();
        self.commands.push(Command::LoadLevel { level, layout });
        self.apply_pending();
        self.scheduler.handle(&self.events[start..], &mut self.commands);
        self.apply_pending();
        Ok(())
    }

    fn apply_pending(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}
