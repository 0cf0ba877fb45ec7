#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Maze Chase headlessly.

mod config;
mod levels;
mod script;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use maze_chase_core::LayoutProvider;
use maze_chase_rendering::{Presentation, RenderingBackend, Scene, TextBackend};
use maze_chase_simulation::Simulation;

use self::{
    levels::LevelSet,
    script::{Script, ScriptAction},
};

/// Headless Maze Chase simulation driven by scripted input.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", version)]
struct Args {
    /// ASCII layout files played in order; the built-in maze is used when omitted.
    #[arg(long = "layout", value_name = "PATH")]
    layouts: Vec<PathBuf>,
    /// TOML tuning file; missing keys keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Simulated seconds to run.
    #[arg(long, default_value_t = 60)]
    seconds: u64,
    /// Overrides the frightened-wandering seed from the tuning.
    #[arg(long)]
    seed: Option<u64>,
    /// Scripted input such as `0:left,90:up,300:pause,360:resume`.
    #[arg(long, default_value = "")]
    script: String,
    /// Draws a frame every N ticks; 0 draws only the final frame.
    #[arg(long, default_value_t = 0)]
    render_every: u64,
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut tuning = config::load_tuning(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        tuning.rng_seed = seed;
    }
    let levels = if args.layouts.is_empty() {
        LevelSet::classic()?
    } else {
        LevelSet::from_paths(&args.layouts)?
    };
    let script = Script::parse(&args.script)?;
    let ticks = args
        .seconds
        .saturating_mul(u64::from(tuning.tick_rate_hz));

    let mut simulation = Simulation::new(tuning, levels).context("failed to start simulation")?;
    let mut backend = TextBackend::new(io::stdout().lock());
    run(&mut simulation, &mut backend, &script, ticks, args.render_every)
}

fn run<P, B>(
    simulation: &mut Simulation<P>,
    backend: &mut B,
    script: &Script,
    ticks: u64,
    render_every: u64,
) -> Result<()>
where
    P: LayoutProvider,
    B: RenderingBackend,
{
    let mut desired = None;
    let mut last_tick = 0;

    for tick in 0..ticks {
        last_tick = tick;
        match script.action_at(tick) {
            Some(ScriptAction::Steer(direction)) => desired = Some(direction),
            Some(ScriptAction::Pause) => log_events(tick, simulation.set_paused(true)),
            Some(ScriptAction::Resume) => log_events(tick, simulation.set_paused(false)),
            None => {}
        }

        let events = simulation
            .step(desired)
            .with_context(|| format!("simulation failed at tick {tick}"))?;
        log_events(tick, events);

        if render_every > 0 && tick % render_every == 0 {
            present(simulation, backend, tick)?;
        }
        if simulation.is_game_over() {
            info!("game over after {} ticks", tick + 1);
            break;
        }
    }

    present(simulation, backend, last_tick)?;
    let snapshot = simulation.snapshot();
    info!(
        "finished with score {} on level {} and {} lives",
        snapshot.score, snapshot.level, snapshot.lives
    );
    Ok(())
}

fn log_events(tick: u64, events: &[maze_chase_core::Event]) {
    for event in events {
        debug!("tick {tick}: {event:?}");
    }
}

fn present<P, B>(simulation: &Simulation<P>, backend: &mut B, tick: u64) -> Result<()>
where
    P: LayoutProvider,
    B: RenderingBackend,
{
    let scene = Scene::compose(simulation.maze(), &simulation.snapshot());
    backend.present(&Presentation::new(format!("tick {tick}"), scene))
}
