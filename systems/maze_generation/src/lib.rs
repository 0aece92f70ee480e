#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural maze generation with connectivity validation.
//!
//! The generator starts from a fully walkable grid and overlays thin dividers.
//! Every divider is placed tentatively and only committed when the entrance can
//! still reach every cell of the grid, which keeps a route to the exit open and
//! rules out pockets sealed off by dividers and the outer border.

use pacboy_core::{config::MazeConfig, CellCoord, CellKind, Divider, Maze};
use rand::Rng;
use tracing::debug;

/// Statistics gathered while generating a single maze.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GenerationReport {
    /// Divider probability used for the Bernoulli pass.
    pub density: f64,
    /// Dividers committed during the Bernoulli pass.
    pub sampled: u32,
    /// Dividers committed while topping up to the configured minimum.
    pub injected: u32,
    /// Tentative dividers rolled back because they broke connectivity.
    pub rejected: u32,
    /// Whether the injection budget ran out before the minimum was met.
    pub exhausted: bool,
    /// Whether the exit access post-pass had to open a neighbor.
    pub forced_exit_access: bool,
}

/// Builds mazes whose divider density scales with the level.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    config: MazeConfig,
}

impl MazeGenerator {
    /// Creates a generator using the provided maze configuration.
    #[must_use]
    pub fn new(config: MazeConfig) -> Self {
        Self { config }
    }

    /// Configuration the generator was built with.
    #[must_use]
    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// Generates the maze for `level`.
    pub fn generate<R>(&self, level: u32, rng: &mut R) -> Maze
    where
        R: Rng + ?Sized,
    {
        self.generate_with_report(level, rng).0
    }

    /// Generates the maze for `level` and reports how the dividers were placed.
    pub fn generate_with_report<R>(&self, level: u32, rng: &mut R) -> (Maze, GenerationReport)
    where
        R: Rng + ?Sized,
    {
        let columns = self.config.width;
        let rows = self.config.height;
        let mut maze = Maze::open(columns, rows);
        let mut report = GenerationReport {
            density: self.config.density_for_level(level).clamp(0.0, 1.0),
            ..GenerationReport::default()
        };

        if columns == 0 || rows == 0 {
            return (maze, report);
        }

        for row in 1..rows.saturating_sub(1) {
            for column in 0..columns {
                let divider = Divider::horizontal(column, row);
                if rng.gen_bool(report.density) {
                    place(&mut maze, divider, &mut report.sampled, &mut report.rejected);
                }
            }
        }

        for row in 0..rows {
            for column in 1..columns.saturating_sub(1) {
                let divider = Divider::vertical(column, row);
                if rng.gen_bool(report.density) {
                    place(&mut maze, divider, &mut report.sampled, &mut report.rejected);
                }
            }
        }

        self.top_up(&mut maze, rng, &mut report);
        maze.set_cell_kind(maze.entrance(), CellKind::Walkable);
        report.forced_exit_access = ensure_exit_access(&mut maze, rng);

        debug!(
            level,
            density = report.density,
            dividers = maze.divider_count(),
            sampled = report.sampled,
            injected = report.injected,
            rejected = report.rejected,
            "maze_generated"
        );

        (maze, report)
    }

    fn top_up<R>(&self, maze: &mut Maze, rng: &mut R, report: &mut GenerationReport)
    where
        R: Rng + ?Sized,
    {
        let required = usize::try_from(self.config.min_dividers).unwrap_or(usize::MAX);
        if maze.divider_count() >= required {
            return;
        }

        let columns = maze.columns();
        let rows = maze.rows();
        let column_span = interior_span(columns);
        let row_span = interior_span(rows);

        for attempt in 0..self.config.injection_attempts {
            if maze.divider_count() >= required {
                break;
            }
            let column = rng.gen_range(column_span.0..column_span.1);
            let row = rng.gen_range(row_span.0..row_span.1);
            let divider = if attempt % 2 == 0 {
                Divider::horizontal(column, row)
            } else {
                Divider::vertical(column, row)
            };
            if !is_candidate_site(maze, divider) {
                continue;
            }
            place(maze, divider, &mut report.injected, &mut report.rejected);
        }

        if maze.divider_count() < required {
            report.exhausted = true;
            debug!(
                placed = maze.divider_count(),
                required, "divider_injection_exhausted"
            );
        }
    }
}

/// Reports whether the divider may be considered at all: it must sit between
/// two cells of the grid and must not touch the entrance or the exit.
#[must_use]
pub fn is_candidate_site(maze: &Maze, divider: Divider) -> bool {
    maze.contains(divider.anchor())
        && maze.contains(divider.far_side())
        && !divider.touches(maze.entrance())
        && !divider.touches(maze.exit())
}

/// Opens one of the exit's two inward neighbors when both are blocked.
///
/// Returns `true` when a neighbor had to be opened.
pub fn ensure_exit_access<R>(maze: &mut Maze, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    let exit = maze.exit();
    let (Some(left_column), Some(up_row)) = (exit.column().checked_sub(1), exit.row().checked_sub(1))
    else {
        return false;
    };
    let left = CellCoord::new(left_column, exit.row());
    let above = CellCoord::new(exit.column(), up_row);

    let blocked = |maze: &Maze, cell: CellCoord| {
        !maze.is_passable(cell) || maze.is_move_blocked(cell, exit)
    };
    if !blocked(maze, left) || !blocked(maze, above) {
        return false;
    }

    let opened = if rng.gen_bool(0.5) { left } else { above };
    maze.set_cell_kind(opened, CellKind::Walkable);
    if let Some(divider) = Maze::divider_between(opened, exit) {
        let _ = maze.remove_divider(divider);
    }
    true
}

fn place(maze: &mut Maze, divider: Divider, placed: &mut u32, rejected: &mut u32) {
    if !is_candidate_site(maze, divider) || !maze.add_divider(divider) {
        return;
    }
    if maze.is_fully_connected() {
        *placed += 1;
    } else {
        let _ = maze.remove_divider(divider);
        *rejected += 1;
    }
}

fn interior_span(length: u32) -> (u32, u32) {
    if length > 4 {
        (2, length - 2)
    } else {
        (0, length)
    }
}
