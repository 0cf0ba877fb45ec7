use maze_chase_core::{CellCoord, Command, Event, GhostId};
use maze_chase_system_scoring::{Config, Scoring};

fn eaten(ghost: u32, chain_index: u32) -> Event {
    Event::GhostEaten {
        ghost: GhostId::new(ghost),
        chain_index,
    }
}

#[test]
fn consumables_and_fruit_score() {
    let mut scoring = Scoring::new(Config::default());
    let mut commands = Vec::new();
    scoring.handle(
        &[
            Event::DotEaten {
                cell: CellCoord::new(1, 1),
            },
            Event::DotEaten {
                cell: CellCoord::new(2, 1),
            },
            Event::PelletEaten {
                cell: CellCoord::new(3, 1),
            },
            Event::FruitEaten {
                cell: CellCoord::new(4, 1),
                points: 300,
            },
        ],
        &mut commands,
    );
    assert_eq!(scoring.score(), 370);
    assert!(commands.is_empty());
}

#[test]
fn chain_scores_double_and_restart_per_activation() {
    let mut scoring = Scoring::new(Config::default());
    let mut commands = Vec::new();

    scoring.handle(&[eaten(0, 1)], &mut commands);
    assert_eq!(scoring.score(), 200);
    scoring.handle(&[eaten(1, 2)], &mut commands);
    assert_eq!(scoring.score(), 600);

    scoring.handle(
        &[
            Event::PelletEaten {
                cell: CellCoord::new(1, 1),
            },
            eaten(2, 1),
        ],
        &mut commands,
    );
    assert_eq!(scoring.score(), 850);
}

#[test]
fn extra_life_is_awarded_once() {
    let mut scoring = Scoring::new(Config::new(10, 50, 200, 1_000));
    let mut commands = Vec::new();

    scoring.handle(&[eaten(0, 1), eaten(1, 2)], &mut commands);
    assert!(commands.is_empty());

    scoring.handle(&[eaten(2, 3)], &mut commands);
    assert_eq!(commands, vec![Command::GrantExtraLife]);

    commands.clear();
    scoring.handle(&[eaten(3, 4)], &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn zero_threshold_disables_extra_life() {
    let mut scoring = Scoring::new(Config::new(10, 50, 200, 0));
    let mut commands = Vec::new();
    scoring.handle(&[eaten(0, 4)], &mut commands);
    assert_eq!(scoring.score(), 1_600);
    assert!(commands.is_empty());
}
