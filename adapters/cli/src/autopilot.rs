//! Scripted input: walk toward the nearest pellet and shoot ghosts in sight.

use std::collections::VecDeque;

use pacboy_core::{AbilityKind, CellCoord, Direction, Maze, PlayState};
use pacboy_session::Session;
use pacboy_world::{query, PelletField};

/// Issues at most one ability and one move for the current state.
pub(crate) fn drive(session: &mut Session) {
    if session.play_state() != PlayState::Playing {
        return;
    }

    let world = session.world();
    let maze = query::maze(world);
    let player = query::player(world);
    let ghosts = query::ghost_cells(world);
    let fire_range = query::config(world).abilities.fire.range;

    let shoot = ghost_in_sight(maze, player.cell, player.direction, &ghosts, fire_range);
    let step = next_step(maze, player.cell, query::pellets(world), &ghosts);

    if shoot && !session.use_ability(AbilityKind::Fire) {
        let _ = session.use_ability(AbilityKind::Freeze);
    }
    if let Some(direction) = step {
        let (dx, dy) = direction.delta();
        let _ = session.try_move(dx, dy);
    }
}

/// Whether a ghost stands within `range` cells straight ahead with no
/// divider in between.
fn ghost_in_sight(
    maze: &Maze,
    from: CellCoord,
    facing: Direction,
    ghosts: &[CellCoord],
    range: u32,
) -> bool {
    let mut cursor = from;
    for _ in 0..range {
        match maze.step(cursor, facing) {
            Some(next) if ghosts.contains(&next) => return true,
            Some(next) => cursor = next,
            None => return false,
        }
    }
    false
}

/// First direction of a shortest ghost-free path to the nearest pellet, or to
/// the exit when no pellet is reachable.
fn next_step(
    maze: &Maze,
    from: CellCoord,
    pellets: &PelletField,
    ghosts: &[CellCoord],
) -> Option<Direction> {
    let mut first_moves: Vec<Option<Direction>> = vec![None; (maze.columns() * maze.rows()) as usize];
    let index = |cell: CellCoord| (cell.row() * maze.columns() + cell.column()) as usize;
    let mut visited = vec![false; first_moves.len()];
    visited[index(from)] = true;
    let mut queue = VecDeque::from([from]);
    let mut exit_move = None;

    while let Some(cell) = queue.pop_front() {
        if cell != from {
            if pellets.has_pellet(cell) {
                return first_moves[index(cell)];
            }
            if cell == maze.exit() && exit_move.is_none() {
                exit_move = first_moves[index(cell)];
            }
        }
        for direction in Direction::ALL {
            let Some(next) = maze.step(cell, direction) else {
                continue;
            };
            if visited[index(next)] || ghosts.contains(&next) {
                continue;
            }
            visited[index(next)] = true;
            first_moves[index(next)] = first_moves[index(cell)].or(Some(direction));
            queue.push_back(next);
        }
    }
    exit_move
}

#[cfg(test)]
mod tests {
    use pacboy_core::Maze;

    use super::*;

    #[test]
    fn heads_for_the_nearest_pellet() {
        let maze = Maze::open(4, 4);
        let mut pellets = PelletField::from_maze(&maze);
        for cell in [CellCoord::new(1, 0), CellCoord::new(0, 0)] {
            let _ = pellets.collect_at(cell);
        }
        assert_eq!(
            next_step(&maze, CellCoord::new(0, 0), &pellets, &[]),
            Some(Direction::Down)
        );
    }

    #[test]
    fn routes_around_ghosts() {
        let maze = Maze::open(3, 1);
        let pellets = PelletField::from_maze(&maze);
        assert_eq!(
            next_step(&maze, CellCoord::new(0, 0), &pellets, &[CellCoord::new(1, 0)]),
            None
        );
    }

    #[test]
    fn falls_back_to_the_exit() {
        let maze = Maze::open(2, 2);
        let mut pellets = PelletField::from_maze(&maze);
        for (cell, _) in maze.cells() {
            let _ = pellets.collect_at(cell);
        }
        let step = next_step(&maze, CellCoord::new(0, 0), &pellets, &[]);
        assert!(matches!(step, Some(Direction::Right | Direction::Down)));
    }

    #[test]
    fn sight_stops_at_dividers_and_range() {
        let mut maze = Maze::open(5, 1);
        let ghosts = [CellCoord::new(3, 0)];
        assert!(ghost_in_sight(&maze, CellCoord::new(0, 0), Direction::Right, &ghosts, 3));
        assert!(!ghost_in_sight(&maze, CellCoord::new(0, 0), Direction::Right, &ghosts, 2));
        assert!(!ghost_in_sight(&maze, CellCoord::new(0, 0), Direction::Left, &ghosts, 5));

        let divider = Maze::divider_between(CellCoord::new(1, 0), CellCoord::new(2, 0))
            .expect("cells are adjacent");
        let _ = maze.add_divider(divider);
        assert!(!ghost_in_sight(&maze, CellCoord::new(0, 0), Direction::Right, &ghosts, 5));
    }
}
