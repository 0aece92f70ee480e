//! Collectible pellets laid over the walkable cells of a maze.

use pacboy_core::{CellCoord, CellKind, Maze};

/// Boolean pellet grid aligned with the maze plus a running count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PelletField {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
    remaining: u32,
}

impl PelletField {
    /// Places a pellet on every walkable cell. Exit and wall cells stay empty.
    #[must_use]
    pub fn from_maze(maze: &Maze) -> Self {
        let cells: Vec<bool> = maze
            .cells()
            .map(|(_, kind)| kind == CellKind::Walkable)
            .collect();
        let remaining = cells.iter().filter(|present| **present).count();
        Self {
            columns: maze.columns(),
            rows: maze.rows(),
            cells,
            remaining: u32::try_from(remaining).unwrap_or(u32::MAX),
        }
    }

    /// Clears the pellet at `cell`. Returns whether one was present.
    pub fn collect_at(&mut self, cell: CellCoord) -> bool {
        let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) else {
            return false;
        };
        if !*slot {
            return false;
        }
        *slot = false;
        self.remaining = self.remaining.saturating_sub(1);
        true
    }

    /// Reports whether a pellet sits on `cell`.
    #[must_use]
    pub fn has_pellet(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Pellets left to collect.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Cells that still hold a pellet, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, present)| **present)
            .map(move |(index, _)| {
                let index = index as u32;
                CellCoord::new(index % columns, index / columns)
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        usize::try_from(cell.row() * self.columns + cell.column()).ok()
    }
}
