#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Random-walk adversary movement that proposes one step per roaming ghost.

use pacboy_core::{CellCoord, Command, Direction, Event, GhostStep, Maze, PlayState};
use pacboy_world::{query::GhostView, Liveness};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pure system that reacts to world events and emits ghost movement commands.
#[derive(Debug)]
pub struct GhostMovement {
    rng: ChaCha8Rng,
    play_state: PlayState,
}

impl GhostMovement {
    /// Creates a movement system drawing from a deterministic stream.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a movement system seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            rng,
            play_state: PlayState::Loading,
        }
    }

    /// Consumes the events emitted since the last round, then plans one
    /// movement round when the world is playing.
    ///
    /// Nothing is emitted when no ghost can move.
    pub fn handle(
        &mut self,
        events: &[Event],
        ghosts: &GhostView,
        maze: &Maze,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::PlayStateChanged { state } = event {
                self.play_state = *state;
            }
        }

        if self.play_state != PlayState::Playing {
            return;
        }

        let steps = plan_round(ghosts, maze, &mut self.rng);
        if !steps.is_empty() {
            out.push(Command::MoveGhosts { steps });
        }
    }
}

/// Picks a step for every roaming ghost in roster order.
///
/// Each ghost tries the four directions in a fresh random order and takes the
/// first one the maze allows onto a cell no other ghost holds. Cells vacated
/// earlier in the round become available to later ghosts.
pub fn plan_round<R>(ghosts: &GhostView, maze: &Maze, rng: &mut R) -> Vec<GhostStep>
where
    R: Rng + ?Sized,
{
    let mut occupied: Vec<CellCoord> = ghosts
        .iter()
        .filter(|ghost| ghost.liveness == Liveness::Alive)
        .map(|ghost| ghost.cell)
        .collect();

    let mut steps = Vec::new();
    for ghost in ghosts.iter() {
        if ghost.liveness != Liveness::Alive {
            continue;
        }
        let mut directions = Direction::ALL;
        directions.shuffle(rng);

        let choice = directions.into_iter().find_map(|direction| {
            maze.step(ghost.cell, direction)
                .filter(|to| !occupied.contains(to))
                .map(|to| (direction, to))
        });

        if let Some((direction, to)) = choice {
            if let Some(slot) = occupied.iter_mut().find(|cell| **cell == ghost.cell) {
                *slot = to;
            }
            steps.push(GhostStep {
                ghost: ghost.id,
                direction,
            });
        }
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacboy_core::{GhostId, GHOST_ROSTER};
    use pacboy_world::query::GhostSnapshot;

    fn ghost(id: u32, cell: CellCoord, liveness: Liveness) -> GhostSnapshot {
        GhostSnapshot {
            id: GhostId::new(id),
            identity: GHOST_ROSTER[id as usize],
            cell,
            direction: Direction::Left,
            liveness,
        }
    }

    #[test]
    fn boxed_in_ghost_stays_put() {
        let mut maze = Maze::open(3, 3);
        let centre = CellCoord::new(1, 1);
        for direction in Direction::ALL {
            let neighbour = centre
                .neighbor(direction, 3, 3)
                .expect("centre has four neighbours");
            let _ = maze.add_divider(Maze::divider_between(centre, neighbour).expect("adjacent"));
        }
        let view = GhostView::from_snapshots(vec![ghost(0, centre, Liveness::Alive)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert!(plan_round(&view, &maze, &mut rng).is_empty());
    }

    #[test]
    fn ghosts_never_step_onto_each_other() {
        let maze = Maze::open(2, 1);
        let view = GhostView::from_snapshots(vec![
            ghost(0, CellCoord::new(0, 0), Liveness::Alive),
            ghost(1, CellCoord::new(1, 0), Liveness::Alive),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        for _ in 0..16 {
            assert!(plan_round(&view, &maze, &mut rng).is_empty());
        }
    }

    #[test]
    fn respawning_ghosts_are_skipped_and_free_their_cell() {
        let maze = Maze::open(2, 1);
        let view = GhostView::from_snapshots(vec![
            ghost(0, CellCoord::new(0, 0), Liveness::Alive),
            ghost(1, CellCoord::new(1, 0), Liveness::Respawning),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let steps = plan_round(&view, &maze, &mut rng);
        assert_eq!(
            steps,
            vec![GhostStep {
                ghost: GhostId::new(0),
                direction: Direction::Right,
            }]
        );
    }

    #[test]
    fn later_ghost_may_enter_a_vacated_cell() {
        let maze = Maze::open(3, 1);
        let view = GhostView::from_snapshots(vec![
            ghost(0, CellCoord::new(1, 0), Liveness::Alive),
            ghost(1, CellCoord::new(0, 0), Liveness::Alive),
        ]);

        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let steps = plan_round(&view, &maze, &mut rng);
            assert_eq!(steps.len(), 2, "seed {seed}");
            assert_eq!(steps[0].direction, Direction::Right);
            assert_eq!(steps[1].direction, Direction::Right);
        }
    }

    #[test]
    fn waits_for_playing_state() {
        let maze = Maze::open(3, 3);
        let view = GhostView::from_snapshots(vec![ghost(0, CellCoord::new(1, 1), Liveness::Alive)]);
        let mut movement = GhostMovement::seeded(5);
        let mut out = Vec::new();

        movement.handle(&[], &view, &maze, &mut out);
        assert!(out.is_empty());

        movement.handle(
            &[Event::PlayStateChanged {
                state: PlayState::Playing,
            }],
            &view,
            &maze,
            &mut out,
        );
        assert_eq!(out.len(), 1);

        out.clear();
        movement.handle(
            &[Event::PlayStateChanged {
                state: PlayState::GameOver,
            }],
            &view,
            &maze,
            &mut out,
        );
        assert!(out.is_empty());
    }
}
