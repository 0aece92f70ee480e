#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Strategic placement of adversaries at level start and on respawn.
//!
//! Every walkable cell is scored by how far it sits from the entrance, how
//! crowded its neighborhood already is and how close it lies to the middle of
//! the maze. The ranking is then sampled with a weighted roll so spawns stay
//! good without being fully predictable.

use std::cmp::Ordering;

use pacboy_core::{CellCoord, CellKind, Maze};
use rand::Rng;

const ENTRANCE_RADIUS: u32 = 3;
const ENTRANCE_PENALTY: f64 = 20.0;
const CROWD_RADIUS: u32 = 2;
const CROWD_PENALTY: f64 = 15.0;
const CENTER_REACH: f64 = 10.0;
const CENTER_WEIGHT: f64 = 2.0;

const TOP_PICK_CHANCE: f64 = 0.7;
const SECOND_PICK_CHANCE: f64 = 0.9;
const SECOND_PICK_PERCENTILE: f64 = 0.3;
const THIRD_PICK_PERCENTILE: f64 = 0.6;

/// Candidate cell together with its strategic score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredCell {
    /// Cell under consideration.
    pub cell: CellCoord,
    /// Higher is better.
    pub score: f64,
}

/// Scores a single cell against the adversaries that are already placed.
#[must_use]
pub fn score_cell(maze: &Maze, cell: CellCoord, occupied: &[CellCoord]) -> f64 {
    let mut score = 0.0;

    if cell.manhattan_distance(maze.entrance()) < ENTRANCE_RADIUS {
        score -= ENTRANCE_PENALTY;
    }

    for other in occupied {
        if cell.manhattan_distance(*other) < CROWD_RADIUS {
            score -= CROWD_PENALTY;
        }
    }

    let center_column = f64::from(maze.columns()) / 2.0;
    let center_row = f64::from(maze.rows()) / 2.0;
    let center_distance = (f64::from(cell.column()) - center_column).abs()
        + (f64::from(cell.row()) - center_row).abs();
    score + (CENTER_REACH - center_distance) * CENTER_WEIGHT
}

/// Ranks every eligible cell from best to worst.
///
/// Eligible cells are walkable, not the entrance, not occupied by another
/// adversary and not the `avoid` cell. Equal scores keep row-major order.
#[must_use]
pub fn ranked_candidates(
    maze: &Maze,
    occupied: &[CellCoord],
    avoid: Option<CellCoord>,
) -> Vec<ScoredCell> {
    let mut ranked: Vec<ScoredCell> = maze
        .cells()
        .filter(|(cell, kind)| {
            *kind == CellKind::Walkable
                && *cell != maze.entrance()
                && Some(*cell) != avoid
                && !occupied.contains(cell)
        })
        .map(|(cell, _)| ScoredCell {
            cell,
            score: score_cell(maze, cell, occupied),
        })
        .collect();

    ranked.sort_by(|left, right| {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// Maps a uniform roll in `[0, 1)` to an index into a ranking of `len` cells.
#[must_use]
pub fn pick_rank(len: usize, roll: f64) -> usize {
    if len == 0 {
        return 0;
    }
    let percentile = if roll < TOP_PICK_CHANCE {
        0.0
    } else if roll < SECOND_PICK_CHANCE {
        SECOND_PICK_PERCENTILE
    } else {
        THIRD_PICK_PERCENTILE
    };
    // Truncation matches the floor of the percentile position.
    let index = (len as f64 * percentile) as usize;
    index.min(len - 1)
}

/// Selects a strategic cell for a single adversary.
///
/// Returns `None` when the maze has no eligible cell left.
pub fn select_strategic_cell<R>(
    maze: &Maze,
    occupied: &[CellCoord],
    avoid: Option<CellCoord>,
    rng: &mut R,
) -> Option<CellCoord>
where
    R: Rng + ?Sized,
{
    let ranked = ranked_candidates(maze, occupied, avoid);
    if ranked.is_empty() {
        return None;
    }
    let roll: f64 = rng.gen();
    ranked.get(pick_rank(ranked.len(), roll)).map(|scored| scored.cell)
}

/// Places `count` adversaries one after another so that each placement sees
/// the ones before it. Stops early when the maze runs out of eligible cells.
pub fn place_group<R>(
    maze: &Maze,
    count: usize,
    avoid: Option<CellCoord>,
    rng: &mut R,
) -> Vec<CellCoord>
where
    R: Rng + ?Sized,
{
    let mut placed = Vec::with_capacity(count);
    for _ in 0..count {
        match select_strategic_cell(maze, &placed, avoid, rng) {
            Some(cell) => placed.push(cell),
            None => break,
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_thresholds_map_to_percentiles() {
        assert_eq!(pick_rank(10, 0.0), 0);
        assert_eq!(pick_rank(10, 0.69), 0);
        assert_eq!(pick_rank(10, 0.7), 3);
        assert_eq!(pick_rank(10, 0.89), 3);
        assert_eq!(pick_rank(10, 0.9), 6);
        assert_eq!(pick_rank(10, 0.99), 6);
    }

    #[test]
    fn pick_rank_handles_tiny_rankings() {
        assert_eq!(pick_rank(0, 0.95), 0);
        assert_eq!(pick_rank(1, 0.95), 0);
        assert_eq!(pick_rank(2, 0.95), 1);
    }

    #[test]
    fn entrance_neighborhood_is_penalised() {
        let maze = Maze::open(10, 16);
        let near = score_cell(&maze, CellCoord::new(1, 1), &[]);
        let far = score_cell(&maze, CellCoord::new(2, 1), &[]);
        assert!((far - near - 22.0).abs() < f64::EPSILON);
    }

    #[test]
    fn crowding_is_penalised_per_neighbor() {
        let maze = Maze::open(10, 16);
        let cell = CellCoord::new(5, 8);
        let alone = score_cell(&maze, cell, &[]);
        let crowded = score_cell(&maze, cell, &[CellCoord::new(5, 7), CellCoord::new(4, 8)]);
        assert!((alone - crowded - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn center_cell_scores_highest_on_open_maze() {
        let maze = Maze::open(10, 16);
        let ranked = ranked_candidates(&maze, &[], None);
        assert_eq!(ranked[0].cell, CellCoord::new(5, 8));
        assert!(ranked.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }
}
