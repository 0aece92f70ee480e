//! Grid and divider model shared by the generator, the world and adapters.

use std::collections::{BTreeSet, VecDeque};

use crate::{CellCoord, Direction};

/// Code stored for every cell of the maze grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Open floor that actors may occupy.
    Walkable,
    /// Solid cell that nothing may enter.
    Wall,
    /// Door at the far corner that completes the level.
    Exit,
}

impl CellKind {
    /// Numeric cell code used by external map formats.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Walkable => 0,
            Self::Wall => 1,
            Self::Exit => 2,
        }
    }

    /// Reports whether actors may stand on the cell.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Walkable | Self::Exit)
    }
}

/// Axis of a thin wall segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DividerOrientation {
    /// Blocks vertical movement between row `y` and row `y + 1` at column `x`.
    Horizontal,
    /// Blocks horizontal movement between column `x` and column `x + 1` at row `y`.
    Vertical,
}

/// Thin wall segment overlaid on the boundary between two cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Divider {
    orientation: DividerOrientation,
    anchor: CellCoord,
}

impl Divider {
    /// Divider below the anchor cell.
    #[must_use]
    pub const fn horizontal(column: u32, row: u32) -> Self {
        Self {
            orientation: DividerOrientation::Horizontal,
            anchor: CellCoord::new(column, row),
        }
    }

    /// Divider to the right of the anchor cell.
    #[must_use]
    pub const fn vertical(column: u32, row: u32) -> Self {
        Self {
            orientation: DividerOrientation::Vertical,
            anchor: CellCoord::new(column, row),
        }
    }

    /// Axis the divider runs along.
    #[must_use]
    pub const fn orientation(&self) -> DividerOrientation {
        self.orientation
    }

    /// Cell on the top or left side of the divider.
    #[must_use]
    pub const fn anchor(&self) -> CellCoord {
        self.anchor
    }

    /// Cell on the bottom or right side of the divider.
    #[must_use]
    pub const fn far_side(&self) -> CellCoord {
        match self.orientation {
            DividerOrientation::Horizontal => {
                CellCoord::new(self.anchor.column(), self.anchor.row() + 1)
            }
            DividerOrientation::Vertical => {
                CellCoord::new(self.anchor.column() + 1, self.anchor.row())
            }
        }
    }

    /// Reports whether the divider sits on an edge of the provided cell.
    #[must_use]
    pub fn touches(&self, cell: CellCoord) -> bool {
        self.anchor == cell || self.far_side() == cell
    }
}

/// Walkable grid plus the thin dividers overlaid on it.
///
/// Dividers never change cell codes; they only remove the edge between two
/// adjacent cells. The entrance is fixed at the top-left corner and the exit
/// at the bottom-right corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
    horizontal: BTreeSet<CellCoord>,
    vertical: BTreeSet<CellCoord>,
}

impl Maze {
    /// Creates a fully walkable maze with the exit placed at the far corner.
    ///
    /// Zero dimensions produce an empty maze without an exit.
    #[must_use]
    pub fn open(columns: u32, rows: u32) -> Self {
        let count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut maze = Self {
            columns,
            rows,
            cells: vec![CellKind::Walkable; count],
            horizontal: BTreeSet::new(),
            vertical: BTreeSet::new(),
        };
        if count > 0 {
            let exit = maze.exit();
            maze.set_cell_kind(exit, CellKind::Exit);
        }
        maze
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell where the player starts every life.
    #[must_use]
    pub const fn entrance(&self) -> CellCoord {
        CellCoord::new(0, 0)
    }

    /// Cell that holds the exit door.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        CellCoord::new(
            self.columns.saturating_sub(1),
            self.rows.saturating_sub(1),
        )
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Cell code stored at the provided coordinate.
    #[must_use]
    pub fn cell_kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Overwrites the code of a single cell. Out of range cells are ignored.
    pub fn set_cell_kind(&mut self, cell: CellCoord, kind: CellKind) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = kind;
            }
        }
    }

    /// Reports whether actors may stand on the cell.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.cell_kind(cell).is_some_and(CellKind::is_passable)
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *kind)
        })
    }

    /// Places a divider. Returns `false` when it was out of range or already present.
    pub fn add_divider(&mut self, divider: Divider) -> bool {
        if !self.divider_in_range(divider) {
            return false;
        }
        match divider.orientation() {
            DividerOrientation::Horizontal => self.horizontal.insert(divider.anchor()),
            DividerOrientation::Vertical => self.vertical.insert(divider.anchor()),
        }
    }

    /// Removes a divider. Returns `false` when it was not present.
    pub fn remove_divider(&mut self, divider: Divider) -> bool {
        match divider.orientation() {
            DividerOrientation::Horizontal => self.horizontal.remove(&divider.anchor()),
            DividerOrientation::Vertical => self.vertical.remove(&divider.anchor()),
        }
    }

    /// Reports whether the divider is placed.
    #[must_use]
    pub fn has_divider(&self, divider: Divider) -> bool {
        match divider.orientation() {
            DividerOrientation::Horizontal => self.horizontal.contains(&divider.anchor()),
            DividerOrientation::Vertical => self.vertical.contains(&divider.anchor()),
        }
    }

    /// Horizontal dividers in deterministic order.
    pub fn horizontal_dividers(&self) -> impl Iterator<Item = Divider> + '_ {
        self.horizontal
            .iter()
            .map(|anchor| Divider::horizontal(anchor.column(), anchor.row()))
    }

    /// Vertical dividers in deterministic order.
    pub fn vertical_dividers(&self) -> impl Iterator<Item = Divider> + '_ {
        self.vertical
            .iter()
            .map(|anchor| Divider::vertical(anchor.column(), anchor.row()))
    }

    /// Total number of placed dividers.
    #[must_use]
    pub fn divider_count(&self) -> usize {
        self.horizontal.len() + self.vertical.len()
    }

    /// Divider sitting between two orthogonally adjacent cells, if they are adjacent.
    #[must_use]
    pub fn divider_between(from: CellCoord, to: CellCoord) -> Option<Divider> {
        match crate::direction_between(from, to)? {
            Direction::Right => Some(Divider::vertical(from.column(), from.row())),
            Direction::Left => Some(Divider::vertical(to.column(), from.row())),
            Direction::Down => Some(Divider::horizontal(from.column(), from.row())),
            Direction::Up => Some(Divider::horizontal(from.column(), to.row())),
        }
    }

    /// Reports whether a divider blocks the move between two adjacent cells.
    #[must_use]
    pub fn is_move_blocked(&self, from: CellCoord, to: CellCoord) -> bool {
        Self::divider_between(from, to).is_some_and(|divider| self.has_divider(divider))
    }

    /// Destination of a single step, or `None` when the step leaves the grid,
    /// enters a non-passable cell or crosses a divider.
    #[must_use]
    pub fn step(&self, from: CellCoord, direction: Direction) -> Option<CellCoord> {
        let to = from.neighbor(direction, self.columns, self.rows)?;
        if !self.is_passable(to) || self.is_move_blocked(from, to) {
            return None;
        }
        Some(to)
    }

    /// Breadth-first flood from `start` over the divider-aware adjacency.
    ///
    /// The returned mask is row-major and sized to the grid. An impassable or
    /// out of range start yields an all-false mask.
    #[must_use]
    pub fn reachable_from(&self, start: CellCoord) -> Vec<bool> {
        let mut visited = vec![false; self.cells.len()];
        let Some(start_index) = self.index(start) else {
            return visited;
        };
        if !self.is_passable(start) {
            return visited;
        }

        visited[start_index] = true;
        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            for direction in Direction::ALL {
                let Some(next) = self.step(cell, direction) else {
                    continue;
                };
                let Some(next_index) = self.index(next) else {
                    continue;
                };
                if visited[next_index] {
                    continue;
                }
                visited[next_index] = true;
                queue.push_back(next);
            }
        }
        visited
    }

    /// Reports whether a path exists between the two cells.
    #[must_use]
    pub fn is_connected(&self, from: CellCoord, to: CellCoord) -> bool {
        let Some(target) = self.index(to) else {
            return false;
        };
        self.reachable_from(from)
            .get(target)
            .copied()
            .unwrap_or(false)
    }

    /// Reports whether every passable cell is reachable from the entrance.
    #[must_use]
    pub fn is_fully_connected(&self) -> bool {
        let reachable = self.reachable_from(self.entrance());
        self.cells
            .iter()
            .zip(reachable)
            .all(|(kind, reached)| reached || !kind.is_passable())
    }

    /// Reports whether every boundary edge of the rectangle is blocked by a
    /// divider or by the outer border. A rectangle covering the whole grid is
    /// trivially enclosed and is reported as such.
    #[must_use]
    pub fn is_region_enclosed(&self, origin: CellCoord, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let right = origin.column() + width - 1;
        let bottom = origin.row() + height - 1;
        if right >= self.columns || bottom >= self.rows {
            return false;
        }

        let top_closed = origin.row() == 0
            || (origin.column()..=right)
                .all(|column| self.has_divider(Divider::horizontal(column, origin.row() - 1)));
        let bottom_closed = bottom + 1 == self.rows
            || (origin.column()..=right)
                .all(|column| self.has_divider(Divider::horizontal(column, bottom)));
        let left_closed = origin.column() == 0
            || (origin.row()..=bottom)
                .all(|row| self.has_divider(Divider::vertical(origin.column() - 1, row)));
        let right_closed = right + 1 == self.columns
            || (origin.row()..=bottom).all(|row| self.has_divider(Divider::vertical(right, row)));

        top_closed && bottom_closed && left_closed && right_closed
    }

    fn divider_in_range(&self, divider: Divider) -> bool {
        let far = divider.far_side();
        self.contains(divider.anchor()) && self.contains(far)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
