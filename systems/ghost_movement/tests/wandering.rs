use std::collections::HashSet;

use pacboy_core::{CellCoord, Command, Event, GameConfig, PlayState};
use pacboy_system_ghost_movement::GhostMovement;
use pacboy_world::{self as world, query, World};

fn replay(seed: u64, rounds: usize) -> (Vec<Vec<CellCoord>>, Vec<Event>) {
    let config = GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    };
    let mut world = World::new(config).expect("default config is valid");
    let mut movement = GhostMovement::seeded(seed);
    let mut log = Vec::new();
    let mut pending = Vec::new();
    world::apply(&mut world, Command::BeginLevel, &mut pending);

    let mut positions = Vec::new();
    for _ in 0..rounds {
        let mut commands = Vec::new();
        movement.handle(
            &pending,
            &query::ghost_view(&world),
            query::maze(&world),
            &mut commands,
        );
        log.append(&mut pending);
        for command in commands {
            world::apply(&mut world, command, &mut pending);
        }
        positions.push(query::ghost_cells(&world));
    }
    log.append(&mut pending);
    (positions, log)
}

#[test]
fn same_seed_replays_identically() {
    assert_eq!(replay(11, 40), replay(11, 40));
}

#[test]
fn ghosts_only_take_legal_single_steps() {
    let (positions, log) = replay(23, 60);
    for window in positions.windows(2) {
        for (before, after) in window[0].iter().zip(&window[1]) {
            assert!(before.manhattan_distance(*after) <= 1);
        }
        let distinct: HashSet<_> = window[1].iter().collect();
        assert_eq!(distinct.len(), window[1].len());
    }
    assert!(log
        .iter()
        .any(|event| matches!(event, Event::GhostAdvanced { .. })));
}

#[test]
fn movement_stops_once_the_game_is_over() {
    let mut world = World::new(GameConfig {
        seed: Some(5),
        ..GameConfig::default()
    })
    .expect("default config is valid");
    let mut movement = GhostMovement::seeded(5);
    let mut commands = Vec::new();
    movement.handle(
        &[Event::PlayStateChanged {
            state: PlayState::GameOver,
        }],
        &query::ghost_view(&world),
        query::maze(&world),
        &mut commands,
    );
    assert!(commands.is_empty());

    let mut events = Vec::new();
    world::apply(&mut world, Command::BeginLevel, &mut events);
    movement.handle(
        &events,
        &query::ghost_view(&world),
        query::maze(&world),
        &mut commands,
    );
    assert_eq!(commands.len(), 1);
}
