#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.

mod agents;
mod maze;

use std::time::Duration;

use log::{debug, info};
use maze_chase_core::{
    CellCoord, Command, Consumable, Direction, Event, GhostId, GhostMode, LayoutTemplate, Phase,
    PlayMode, TargetPoint, Tuning,
};

use self::agents::{accumulate, Fruit, Ghost, Player, PowerMode};

pub use self::maze::Maze;

/// Progress of the game hosted by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// No level has been loaded yet.
    AwaitingLevel,
    /// A level is in progress.
    Playing,
    /// The last consumable was eaten; the next level must be loaded.
    LevelCleared,
    /// The player ran out of lives.
    GameOver,
}

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    layout: Option<LayoutTemplate>,
    maze: Maze,
    player: Player,
    ghosts: Vec<Ghost>,
    power: Option<PowerMode>,
    fruit: Option<Fruit>,
    fruits_spawned: usize,
    dots_eaten: u32,
    global_phase: Phase,
    play_mode: PlayMode,
    status: Status,
    level: u32,
    lives: u32,
    tick_index: u64,
    tick_dt: Duration,
}

impl World {
    /// Creates a world awaiting its first level.
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        let lives = tuning.starting_lives;
        Self {
            tuning,
            layout: None,
            maze: Maze::empty(),
            player: Player::spawn(CellCoord::new(0, 0)),
            ghosts: Vec::new(),
            power: None,
            fruit: None,
            fruits_spawned: 0,
            dots_eaten: 0,
            global_phase: Phase::Scatter,
            play_mode: PlayMode::Running,
            status: Status::AwaitingLevel,
            level: 0,
            lives,
            tick_index: 0,
            tick_dt: Duration::ZERO,
        }
    }

    fn accepts_moves(&self) -> bool {
        self.status == Status::Playing && self.play_mode == PlayMode::Running
    }

    fn reset_agents(&mut self) {
        self.power = None;
        self.fruit = None;
        self.global_phase = Phase::Scatter;

        let Some(layout) = self.layout.as_ref() else {
            self.ghosts.clear();
            return;
        };

        self.player = Player::spawn(layout.player_start());
        let (columns, rows) = (layout.columns(), layout.rows());
        self.ghosts = layout
            .ghost_starts()
            .iter()
            .map(|&(personality, home)| {
                Ghost::spawn(
                    personality,
                    home,
                    personality.profile().corner.resolve(columns, rows),
                    self.tuning.house_exit_delay(personality),
                )
            })
            .collect();
    }

    fn load_level(&mut self, level: u32, layout: LayoutTemplate, out_events: &mut Vec<Event>) {
        self.maze = Maze::from_layout(&layout);
        self.layout = Some(layout);
        self.level = level;
        self.dots_eaten = 0;
        self.fruits_spawned = 0;
        self.reset_agents();
        if self.status != Status::GameOver {
            self.status = Status::Playing;
        }

        info!(
            "level {level} started with {} consumables",
            self.maze.dots_remaining()
        );
        out_events.push(Event::LevelStarted {
            level,
            dots_remaining: self.maze.dots_remaining(),
        });
    }

    fn advance_timers(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        self.tick_dt = dt;
        out_events.push(Event::TimeAdvanced { dt });

        if let Some(power) = self.power.as_mut() {
            power.remaining = power.remaining.saturating_sub(dt);
            if power.remaining.is_zero() {
                self.end_power(out_events);
            }
        }

        self.player.accumulator =
            accumulate(self.player.accumulator, dt, self.tuning.player_step());

        let entrance = self.maze.house_entrance();
        let released_mode = self.global_phase.as_mode();
        for ghost in &mut self.ghosts {
            if ghost.in_house {
                ghost.house_exit_timer = ghost.house_exit_timer.saturating_sub(dt);
                if ghost.house_exit_timer.is_zero() {
                    ghost.release(entrance, released_mode);
                    debug!("ghost {} released", ghost.id.get());
                    out_events.push(Event::GhostReleased {
                        ghost: ghost.id,
                        cell: entrance,
                    });
                }
            } else {
                let step = self.tuning.ghost_step(ghost.mode);
                ghost.accumulator = accumulate(ghost.accumulator, dt, step);
            }
        }

        if let Some(fruit) = self.fruit.as_mut() {
            fruit.remaining = fruit.remaining.saturating_sub(dt);
            if fruit.remaining.is_zero() {
                self.fruit = None;
                out_events.push(Event::FruitExpired);
            }
        }
    }

    fn step_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if !self.accepts_moves() {
            return;
        }

        let step = self.tuning.player_step();
        if self.player.accumulator < step {
            return;
        }

        let from = self.player.cell;
        let Some(to) = self.maze.walkable_neighbor(from, direction) else {
            return;
        };

        self.player.cell = to;
        self.player.direction = direction;
        if self.player.next_direction == Some(direction) {
            self.player.next_direction = None;
        }
        self.player.accumulator = self.player.accumulator.saturating_sub(step);
        out_events.push(Event::PlayerMoved { from, to });

        self.eat_at(to, out_events);
    }

    fn eat_at(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let consumed = self.maze.consume(cell);
        match consumed {
            Some(Consumable::Dot) => {
                self.dots_eaten = self.dots_eaten.saturating_add(1);
                out_events.push(Event::DotEaten { cell });
            }
            Some(Consumable::PowerPellet) => {
                self.dots_eaten = self.dots_eaten.saturating_add(1);
                out_events.push(Event::PelletEaten { cell });
                self.activate_power(out_events);
            }
            None => {}
        }

        if let Some(fruit) = self.fruit.filter(|fruit| fruit.cell == cell) {
            self.fruit = None;
            out_events.push(Event::FruitEaten {
                cell,
                points: fruit.points,
            });
        }

        if consumed.is_none() {
            return;
        }

        if self.maze.dots_remaining() == 0 {
            self.status = Status::LevelCleared;
            info!("level {} complete", self.level);
            out_events.push(Event::LevelComplete { level: self.level });
            return;
        }

        self.spawn_due_fruit(out_events);
    }

    /// Starts power mode with the current tick already counted against it.
    fn activate_power(&mut self, out_events: &mut Vec<Event>) {
        let duration = self.tuning.power_duration(self.level);
        let remaining = duration.saturating_sub(self.tick_dt);
        self.power = Some(PowerMode {
            remaining,
            chain_count: 0,
        });

        for ghost in self
            .ghosts
            .iter_mut()
            .filter(|ghost| !ghost.in_house && ghost.mode != GhostMode::Eaten)
        {
            ghost.mode = GhostMode::Frightened;
            ghost.reverse_pending = true;
            ghost.target = None;
        }

        debug!("power mode active for {duration:?}");
        out_events.push(Event::PowerModeStarted { duration });
        if remaining.is_zero() {
            self.end_power(out_events);
        }
    }

    fn end_power(&mut self, out_events: &mut Vec<Event>) {
        self.power = None;
        let mode = self.global_phase.as_mode();
        for ghost in self
            .ghosts
            .iter_mut()
            .filter(|ghost| ghost.mode == GhostMode::Frightened)
        {
            ghost.mode = mode;
            ghost.reverse_pending = false;
        }
        debug!("power mode ended, ghosts revert to {mode:?}");
        out_events.push(Event::PowerModeEnded);
    }

    fn spawn_due_fruit(&mut self, out_events: &mut Vec<Event>) {
        let Some(layout) = self.layout.as_ref() else {
            return;
        };

        while let Some(&threshold) = self.tuning.fruit_thresholds.get(self.fruits_spawned) {
            if self.dots_eaten < threshold {
                break;
            }
            self.fruits_spawned += 1;

            let cell = layout.fruit_cell().unwrap_or(layout.player_start());
            let points = self.tuning.fruit_points(self.level);
            self.fruit = Some(Fruit {
                cell,
                points,
                remaining: self.tuning.fruit_lifetime(),
            });
            out_events.push(Event::FruitSpawned { cell, points });
        }
    }

    fn step_ghost(
        &mut self,
        ghost_id: GhostId,
        direction: Direction,
        target: Option<TargetPoint>,
        out_events: &mut Vec<Event>,
    ) {
        if !self.accepts_moves() {
            return;
        }

        let entrance = self.maze.house_entrance();
        let global_mode = self.global_phase.as_mode();
        let Some(ghost) = self.ghosts.iter_mut().find(|ghost| ghost.id == ghost_id) else {
            return;
        };
        if ghost.in_house {
            return;
        }

        let step = self.tuning.ghost_step(ghost.mode);
        if ghost.accumulator < step {
            return;
        }

        let from = ghost.cell;
        let Some(to) = self.maze.walkable_neighbor(from, direction) else {
            return;
        };

        ghost.cell = to;
        ghost.direction = direction;
        ghost.target = target;
        ghost.reverse_pending = false;
        ghost.accumulator = ghost.accumulator.saturating_sub(step);
        out_events.push(Event::GhostMoved {
            ghost: ghost_id,
            from,
            to,
        });

        if ghost.mode == GhostMode::Eaten && to == entrance {
            ghost.revive(global_mode);
            debug!("ghost {} revived as {global_mode:?}", ghost_id.get());
            out_events.push(Event::GhostRevived {
                ghost: ghost_id,
                mode: global_mode,
            });
        }
    }

    fn set_global_phase(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        if self.global_phase == phase {
            return;
        }

        self.global_phase = phase;
        for ghost in self
            .ghosts
            .iter_mut()
            .filter(|ghost| !ghost.mode.is_overridden())
        {
            ghost.mode = phase.as_mode();
        }

        debug!("global phase is now {phase:?}");
        out_events.push(Event::ModeChanged { phase });
    }

    fn eat_ghost(&mut self, ghost_id: GhostId, out_events: &mut Vec<Event>) {
        if !self.accepts_moves() {
            return;
        }

        let player_cell = self.player.cell;
        let entrance_cell = self.maze.house_entrance();
        let entrance = TargetPoint::from_cell(entrance_cell);
        let global_mode = self.global_phase.as_mode();
        let Some(power) = self.power.as_mut() else {
            return;
        };
        let Some(ghost) = self.ghosts.iter_mut().find(|ghost| ghost.id == ghost_id) else {
            return;
        };
        if ghost.in_house || ghost.mode != GhostMode::Frightened || ghost.cell != player_cell {
            return;
        }

        ghost.mode = GhostMode::Eaten;
        ghost.target = Some(entrance);
        ghost.reverse_pending = false;
        power.chain_count = power.chain_count.saturating_add(1);
        out_events.push(Event::GhostEaten {
            ghost: ghost_id,
            chain_index: power.chain_count,
        });

        // Already home: there is no arrival step left to take.
        if ghost.cell == entrance_cell {
            ghost.revive(global_mode);
            debug!("ghost {} revived as {global_mode:?}", ghost_id.get());
            out_events.push(Event::GhostRevived {
                ghost: ghost_id,
                mode: global_mode,
            });
        }
    }

    fn lose_life(&mut self, out_events: &mut Vec<Event>) {
        if !self.accepts_moves() {
            return;
        }

        let player_cell = self.player.cell;
        let caught = self.ghosts.iter().any(|ghost| {
            !ghost.in_house && !ghost.mode.is_overridden() && ghost.cell == player_cell
        });
        if !caught {
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        self.reset_agents();
        info!("life lost, {} remaining", self.lives);
        out_events.push(Event::LifeLost {
            lives_remaining: self.lives,
        });

        if self.lives == 0 {
            self.status = Status::GameOver;
            info!("game over on level {}", self.level);
            out_events.push(Event::GameOver);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { level, layout } => world.load_level(level, layout, out_events),
        Command::Tick { dt } => {
            if world.accepts_moves() {
                world.advance_timers(dt, out_events);
            }
        }
        Command::SetPlayMode { mode } => {
            if world.play_mode != mode {
                world.play_mode = mode;
                out_events.push(Event::PlayModeChanged { mode });
            }
        }
        Command::QueuePlayerDirection { direction } => {
            world.player.next_direction = Some(direction);
        }
        Command::StepPlayer { direction } => world.step_player(direction, out_events),
        Command::StepGhost {
            ghost,
            direction,
            target,
        } => world.step_ghost(ghost, direction, target, out_events),
        Command::SetGlobalPhase { phase } => world.set_global_phase(phase, out_events),
        Command::EatGhost { ghost } => world.eat_ghost(ghost, out_events),
        Command::LoseLife => world.lose_life(out_events),
        Command::GrantExtraLife => {
            if world.status != Status::GameOver {
                world.lives = world.lives.saturating_add(1);
                out_events.push(Event::ExtraLifeGranted { lives: world.lives });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_chase_core::{
        FruitSnapshot, GhostView, Phase, PlayMode, PlayerSnapshot, PowerModeSnapshot, Tuning,
    };

    use super::{Maze, Status, World};

    /// Tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Provides read-only access to the maze of the current level.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Captures the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot(world.tuning.player_step())
    }

    /// Captures a read-only view of the ghosts.
    #[must_use]
    pub fn ghost_view(world: &World) -> GhostView {
        GhostView::from_snapshots(
            world
                .ghosts
                .iter()
                .map(|ghost| ghost.snapshot(world.tuning.ghost_step(ghost.mode)))
                .collect(),
        )
    }

    /// Captures the active power mode, if any.
    #[must_use]
    pub fn power_mode(world: &World) -> Option<PowerModeSnapshot> {
        world.power.map(|power| PowerModeSnapshot {
            remaining: power.remaining,
            chain_count: power.chain_count,
        })
    }

    /// Captures the bonus fruit, if one is on the board.
    #[must_use]
    pub fn fruit(world: &World) -> Option<FruitSnapshot> {
        world.fruit.map(|fruit| FruitSnapshot {
            cell: fruit.cell,
            points: fruit.points,
            remaining: fruit.remaining,
        })
    }

    /// Global scatter/chase phase mirrored from the scheduler.
    #[must_use]
    pub fn global_phase(world: &World) -> Phase {
        world.global_phase
    }

    /// Whether ticks are accepted.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Progress of the game.
    #[must_use]
    pub fn status(world: &World) -> Status {
        world.status
    }

    /// One-based number of the current level; zero before the first load.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Lives left.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Consumables eaten on the current level.
    #[must_use]
    pub fn dots_eaten(world: &World) -> u32 {
        world.dots_eaten
    }

    /// Number of ticks processed since creation.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{GhostSnapshot, Personality};

    const STEP: Duration = Duration::from_millis(125);

    const CORRIDOR: &str = "\
#######
#o PE.#
##01###
#######";

    fn world_with(text: &str, tuning: Tuning) -> World {
        let mut world = World::new(tuning);
        let layout = LayoutTemplate::parse(text).expect("layout parses");
        let _ = run(&mut world, Command::LoadLevel { level: 1, layout });
        world
    }

    fn instant_release() -> Tuning {
        Tuning {
            house_exit_ms: [0; 4],
            ..Tuning::default()
        }
    }

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn tick(world: &mut World) -> Vec<Event> {
        run(world, Command::Tick { dt: STEP })
    }

    fn step_player(world: &mut World, direction: Direction) -> Vec<Event> {
        let mut events = tick(world);
        events.extend(run(world, Command::StepPlayer { direction }));
        events
    }

    fn ghost(world: &World, id: u32) -> GhostSnapshot {
        query::ghost_view(world)
            .iter()
            .find(|ghost| ghost.id == GhostId::new(id))
            .copied()
            .expect("ghost exists")
    }

    const WIDE: &str = "\
########
#o PE..#
##01####
########";

    /// Both ghosts frightened on the cell right of the entrance, with the player on them.
    fn frightened_beside_entrance() -> World {
        let mut world = world_with(WIDE, instant_release());
        let _ = step_player(&mut world, Direction::Left);
        let _ = step_player(&mut world, Direction::Left);
        let _ = step_player(&mut world, Direction::Right);
        for id in 0..2 {
            let _ = run(
                &mut world,
                Command::StepGhost {
                    ghost: GhostId::new(id),
                    direction: Direction::Right,
                    target: None,
                },
            );
        }
        let _ = step_player(&mut world, Direction::Right);
        let _ = step_player(&mut world, Direction::Right);
        let _ = step_player(&mut world, Direction::Right);
        assert_eq!(query::player(&world).cell, CellCoord::new(5, 1));
        assert!(query::ghost_view(&world).iter().all(|ghost| {
            ghost.cell == CellCoord::new(5, 1) && ghost.mode == GhostMode::Frightened
        }));
        world
    }

    #[test]
    fn load_level_places_agents_in_start_cells() {
        let mut world = World::default();
        let layout = LayoutTemplate::parse(CORRIDOR).expect("layout parses");
        let events = run(&mut world, Command::LoadLevel { level: 1, layout });

        assert_eq!(
            events,
            vec![Event::LevelStarted {
                level: 1,
                dots_remaining: 2
            }]
        );
        assert_eq!(query::status(&world), Status::Playing);
        assert_eq!(query::player(&world).cell, CellCoord::new(3, 1));
        let ghosts = query::ghost_view(&world).into_vec();
        assert_eq!(ghosts.len(), 2);
        assert!(ghosts.iter().all(|ghost| ghost.in_house));
        assert_eq!(ghosts[0].personality, Personality::Chaser);
        assert_eq!(ghosts[0].mode, GhostMode::Scatter);
    }

    #[test]
    fn single_dot_completes_level_in_same_tick() {
        let layout = "\
#######
#     #
#  E  #
#     #
#     #
#   P.#
#######";
        let mut world = world_with(layout, Tuning::default());
        assert_eq!(query::maze(&world).dots_remaining(), 1);

        let events = step_player(&mut world, Direction::Right);

        assert!(events.contains(&Event::DotEaten {
            cell: CellCoord::new(5, 5)
        }));
        assert!(events.contains(&Event::LevelComplete { level: 1 }));
        assert_eq!(query::maze(&world).dots_remaining(), 0);
        assert_eq!(query::status(&world), Status::LevelCleared);
    }

    #[test]
    fn player_waits_for_accumulator() {
        let mut world = world_with(CORRIDOR, Tuning::default());
        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(50),
            },
        );
        let events = run(
            &mut world,
            Command::StepPlayer {
                direction: Direction::Left,
            },
        );
        assert!(events.is_empty());
        assert_eq!(query::player(&world).cell, CellCoord::new(3, 1));
    }

    #[test]
    fn walls_reject_player_steps() {
        let mut world = world_with(CORRIDOR, Tuning::default());
        let events = step_player(&mut world, Direction::Up);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::PlayerMoved { .. })));
        assert_eq!(query::player(&world).cell, CellCoord::new(3, 1));
    }

    #[test]
    fn player_wraps_through_tunnel() {
        let mut world = world_with("#####\nTP.ET\n#####", Tuning::default());
        let _ = step_player(&mut world, Direction::Left);
        let events = step_player(&mut world, Direction::Left);
        assert!(events.contains(&Event::PlayerMoved {
            from: CellCoord::new(0, 1),
            to: CellCoord::new(4, 1),
        }));
    }

    #[test]
    fn pellet_frightens_released_ghosts_with_reversal() {
        let tuning = Tuning {
            house_exit_ms: [0, 60_000, 0, 0],
            ..Tuning::default()
        };
        let mut world = world_with(CORRIDOR, tuning);
        let _ = step_player(&mut world, Direction::Left);
        let events = step_player(&mut world, Direction::Left);

        assert!(events.contains(&Event::PelletEaten {
            cell: CellCoord::new(1, 1)
        }));
        assert!(events.contains(&Event::PowerModeStarted {
            duration: Duration::from_secs(6)
        }));

        let chaser = ghost(&world, 0);
        assert_eq!(chaser.mode, GhostMode::Frightened);
        assert!(chaser.reverse_pending);
        let ambusher = ghost(&world, 1);
        assert!(ambusher.in_house);
        assert_eq!(ambusher.mode, GhostMode::Scatter);
    }

    #[test]
    fn power_expiry_adopts_phase_current_at_expiry() {
        let mut world = world_with(CORRIDOR, instant_release());
        let _ = step_player(&mut world, Direction::Left);
        let _ = step_player(&mut world, Direction::Left);
        let events = run(
            &mut world,
            Command::SetGlobalPhase {
                phase: Phase::Chase,
            },
        );
        assert_eq!(events, vec![Event::ModeChanged { phase: Phase::Chase }]);
        assert_eq!(ghost(&world, 0).mode, GhostMode::Frightened);

        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(6),
            },
        );

        assert!(events.contains(&Event::PowerModeEnded));
        assert!(query::power_mode(&world).is_none());
        assert_eq!(ghost(&world, 0).mode, GhostMode::Chase);
        assert_eq!(ghost(&world, 1).mode, GhostMode::Chase);
    }

    #[test]
    fn eating_ghosts_grows_the_chain() {
        let mut world = frightened_beside_entrance();

        let first = run(&mut world, Command::EatGhost { ghost: GhostId::new(0) });
        let second = run(&mut world, Command::EatGhost { ghost: GhostId::new(1) });
        let repeated = run(&mut world, Command::EatGhost { ghost: GhostId::new(1) });

        assert_eq!(
            first,
            vec![Event::GhostEaten {
                ghost: GhostId::new(0),
                chain_index: 1
            }]
        );
        assert_eq!(
            second,
            vec![Event::GhostEaten {
                ghost: GhostId::new(1),
                chain_index: 2
            }]
        );
        assert!(repeated.is_empty());
        assert_eq!(query::power_mode(&world).map(|power| power.chain_count), Some(2));

        let eaten = ghost(&world, 0);
        assert_eq!(eaten.mode, GhostMode::Eaten);
        assert_eq!(
            eaten.target,
            Some(TargetPoint::from_cell(CellCoord::new(4, 1)))
        );
    }

    #[test]
    fn eaten_ghost_revives_at_entrance() {
        let mut world = frightened_beside_entrance();
        let _ = run(&mut world, Command::EatGhost { ghost: GhostId::new(0) });

        let _ = tick(&mut world);
        let back = run(
            &mut world,
            Command::StepGhost {
                ghost: GhostId::new(0),
                direction: Direction::Left,
                target: None,
            },
        );

        assert_eq!(
            back,
            vec![
                Event::GhostMoved {
                    ghost: GhostId::new(0),
                    from: CellCoord::new(5, 1),
                    to: CellCoord::new(4, 1),
                },
                Event::GhostRevived {
                    ghost: GhostId::new(0),
                    mode: GhostMode::Scatter,
                },
            ]
        );
        let revived = ghost(&world, 0);
        assert_eq!(revived.mode, GhostMode::Scatter);
        assert_eq!(revived.target, None);
    }

    #[test]
    fn ghost_eaten_on_entrance_revives_at_once() {
        let mut world = world_with(CORRIDOR, instant_release());
        let _ = step_player(&mut world, Direction::Left);
        let _ = step_player(&mut world, Direction::Left);
        let _ = step_player(&mut world, Direction::Right);
        let _ = step_player(&mut world, Direction::Right);
        let _ = step_player(&mut world, Direction::Right);
        assert_eq!(query::player(&world).cell, CellCoord::new(4, 1));

        let events = run(&mut world, Command::EatGhost { ghost: GhostId::new(0) });

        assert_eq!(
            events,
            vec![
                Event::GhostEaten {
                    ghost: GhostId::new(0),
                    chain_index: 1
                },
                Event::GhostRevived {
                    ghost: GhostId::new(0),
                    mode: GhostMode::Scatter,
                },
            ]
        );
        assert_eq!(ghost(&world, 0).mode, GhostMode::Scatter);
        assert_eq!(query::power_mode(&world).map(|power| power.chain_count), Some(1));
    }

    #[test]
    fn pellet_tick_counts_against_power() {
        let mut world = world_with(CORRIDOR, instant_release());
        let _ = step_player(&mut world, Direction::Left);
        let _ = step_player(&mut world, Direction::Left);

        let full = query::tuning(&world).power_duration(1);
        assert_eq!(
            query::power_mode(&world).map(|power| power.remaining),
            Some(full - STEP)
        );
    }

    #[test]
    fn power_shorter_than_a_tick_ends_on_the_pellet_tick() {
        let tuning = Tuning {
            power_ms: 100,
            ..instant_release()
        };
        let mut world = world_with(CORRIDOR, tuning);
        let _ = step_player(&mut world, Direction::Left);
        let events = step_player(&mut world, Direction::Left);

        assert!(events.contains(&Event::PowerModeStarted {
            duration: Duration::from_millis(100)
        }));
        assert_eq!(events.last(), Some(&Event::PowerModeEnded));
        assert!(query::power_mode(&world).is_none());
        assert!(query::ghost_view(&world)
            .iter()
            .all(|ghost| ghost.mode == GhostMode::Scatter && !ghost.reverse_pending));
    }

    #[test]
    fn hostile_contact_costs_a_life_and_resets_agents() {
        let mut world = world_with(CORRIDOR, instant_release());
        let _ = step_player(&mut world, Direction::Right);
        assert_eq!(query::player(&world).cell, CellCoord::new(4, 1));

        let events = run(&mut world, Command::LoseLife);

        assert_eq!(events, vec![Event::LifeLost { lives_remaining: 2 }]);
        assert_eq!(query::lives(&world), 2);
        assert_eq!(query::player(&world).cell, CellCoord::new(3, 1));
        assert!(query::ghost_view(&world).iter().all(|ghost| ghost.in_house));
    }

    #[test]
    fn lose_life_without_contact_is_ignored() {
        let mut world = world_with(CORRIDOR, instant_release());
        let _ = tick(&mut world);
        assert!(run(&mut world, Command::LoseLife).is_empty());
        assert_eq!(query::lives(&world), 3);
    }

    #[test]
    fn last_life_ends_the_game() {
        let tuning = Tuning {
            starting_lives: 1,
            ..instant_release()
        };
        let mut world = world_with(CORRIDOR, tuning);
        let _ = step_player(&mut world, Direction::Right);

        let events = run(&mut world, Command::LoseLife);

        assert_eq!(
            events,
            vec![Event::LifeLost { lives_remaining: 0 }, Event::GameOver]
        );
        assert_eq!(query::status(&world), Status::GameOver);
        assert!(tick(&mut world).is_empty());
    }

    #[test]
    fn extra_life_is_withheld_after_game_over() {
        let tuning = Tuning {
            starting_lives: 1,
            ..instant_release()
        };
        let mut world = world_with(CORRIDOR, tuning);
        let _ = step_player(&mut world, Direction::Right);
        let _ = run(&mut world, Command::LoseLife);

        assert!(run(&mut world, Command::GrantExtraLife).is_empty());
        assert_eq!(query::lives(&world), 0);
    }

    #[test]
    fn paused_world_ignores_ticks() {
        let mut world = world_with(CORRIDOR, Tuning::default());
        let events = run(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Paused,
            },
        );
        assert_eq!(
            events,
            vec![Event::PlayModeChanged {
                mode: PlayMode::Paused
            }]
        );
        assert!(tick(&mut world).is_empty());
        assert_eq!(query::tick_index(&world), 0);
        assert_eq!(query::player(&world).accumulated, Duration::ZERO);
    }

    #[test]
    fn global_phase_skips_frightened_ghosts() {
        let mut world = world_with(CORRIDOR, instant_release());
        let _ = step_player(&mut world, Direction::Left);
        let _ = step_player(&mut world, Direction::Left);
        let _ = run(
            &mut world,
            Command::SetGlobalPhase {
                phase: Phase::Chase,
            },
        );
        assert!(query::ghost_view(&world)
            .iter()
            .all(|ghost| ghost.mode == GhostMode::Frightened));
        assert!(run(
            &mut world,
            Command::SetGlobalPhase {
                phase: Phase::Chase
            }
        )
        .is_empty());
    }

    #[test]
    fn fruit_spawns_at_threshold_and_expires() {
        let tuning = Tuning {
            fruit_thresholds: vec![1],
            ..Tuning::default()
        };
        let layout = "\
#######
#F  E #
#P...o#
#######";
        let mut world = world_with(layout, tuning);
        let events = step_player(&mut world, Direction::Right);

        assert!(events.contains(&Event::FruitSpawned {
            cell: CellCoord::new(1, 1),
            points: 100,
        }));
        assert!(query::fruit(&world).is_some());

        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(9_500),
            },
        );
        assert!(events.contains(&Event::FruitExpired));
        assert!(query::fruit(&world).is_none());
    }

    #[test]
    fn fruit_is_collected_on_entry() {
        let tuning = Tuning {
            fruit_thresholds: vec![1],
            ..Tuning::default()
        };
        let layout = "\
#######
#F  E #
#P...o#
#######";
        let mut world = world_with(layout, tuning);
        let _ = step_player(&mut world, Direction::Right);
        let _ = step_player(&mut world, Direction::Left);
        let events = step_player(&mut world, Direction::Up);

        assert!(events.contains(&Event::FruitEaten {
            cell: CellCoord::new(1, 1),
            points: 100,
        }));
    }

    #[test]
    fn extra_life_is_granted() {
        let mut world = world_with(CORRIDOR, Tuning::default());
        let events = run(&mut world, Command::GrantExtraLife);
        assert_eq!(events, vec![Event::ExtraLifeGranted { lives: 4 }]);
    }
}
