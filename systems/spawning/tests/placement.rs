use std::collections::HashSet;

use pacboy_core::{CellCoord, CellKind, Maze};
use pacboy_system_spawning::{place_group, select_strategic_cell};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn group_placement_uses_distinct_walkable_cells() {
    let maze = Maze::open(10, 16);
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let placed = place_group(&maze, 5, Some(maze.entrance()), &mut rng);

    assert_eq!(placed.len(), 5);
    let unique: HashSet<_> = placed.iter().copied().collect();
    assert_eq!(unique.len(), 5);
    for cell in placed {
        assert_eq!(maze.cell_kind(cell), Some(CellKind::Walkable));
        assert_ne!(cell, maze.entrance());
    }
}

#[test]
fn selection_skips_occupied_and_avoided_cells() {
    let maze = Maze::open(2, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    // Entrance and exit are never eligible; (1, 0) is avoided.
    let chosen = select_strategic_cell(&maze, &[], Some(CellCoord::new(1, 0)), &mut rng);
    assert_eq!(chosen, Some(CellCoord::new(0, 1)));

    let none = select_strategic_cell(
        &maze,
        &[CellCoord::new(0, 1)],
        Some(CellCoord::new(1, 0)),
        &mut rng,
    );
    assert_eq!(none, None);
}

#[test]
fn group_placement_stops_when_cells_run_out() {
    let maze = Maze::open(2, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let placed = place_group(&maze, 4, None, &mut rng);
    assert_eq!(placed.len(), 2);
}

#[test]
fn most_rolls_land_on_the_best_cell() {
    let maze = Maze::open(10, 16);
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let best = CellCoord::new(5, 8);
    let hits = (0..400)
        .filter(|_| select_strategic_cell(&maze, &[], None, &mut rng) == Some(best))
        .count();
    assert!((220..=340).contains(&hits), "best cell chosen {hits} times");
}
