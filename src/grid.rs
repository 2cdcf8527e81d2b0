//! Sparse cell store and grid geometry.
//!
//! `GridStore` is the sole owner of every `Cell`. Cells refer to their
//! neighbors by coordinate (`NeighborLinks`), never by pointer, so the store
//! stays the single owner and lookups go back through it. Rows are allocated
//! lazily on the first write into that row; cells are never removed.
//!
//! `GridGeometry` maps between cell coordinates and world space. Cell `(0, 0)`
//! sits in the middle of a fixed logical extent (300×300 cells by default).
//! The extent only places the origin; neither the store nor the view is
//! bounded by it.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use std::collections::BTreeMap;
use std::fmt;

use crate::adjacency::{self, AdjacencyMask, Direction};
use crate::camera::Point;
use crate::color::Color;
use crate::region::RegionId;

/// Integer cell address. Rows grow southward, columns eastward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCoord {
    pub row: i32,
    pub col: i32,
}

impl CellCoord {
    #[must_use]
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// String key of the form `"{row}.{col}"`.
    #[must_use]
    pub fn key(self) -> String {
        format!("{}.{}", self.row, self.col)
    }

    /// Parse a `"{row}.{col}"` key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let (row, col) = key.split_once('.')?;
        match (row.parse(), col.parse()) {
            (Ok(row), Ok(col)) => Some(Self { row, col }),
            _ => None,
        }
    }

    /// The adjacent coordinate toward `dir`, or `None` past the integer range.
    #[must_use]
    pub fn step(self, dir: Direction) -> Option<Self> {
        let (dr, dc) = dir.offset();
        Some(Self { row: self.row.checked_add(dr)?, col: self.col.checked_add(dc)? })
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.row, self.col)
    }
}

/// Coordinates of a cell's live neighbors, one slot per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborLinks([Option<CellCoord>; 4]);

impl NeighborLinks {
    #[must_use]
    pub fn get(&self, dir: Direction) -> Option<CellCoord> {
        self.0[dir.index()]
    }

    pub fn set(&mut self, dir: Direction, coord: Option<CellCoord>) {
        self.0[dir.index()] = coord;
    }

    /// Present links in direction order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, CellCoord)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| self.get(dir).map(|coord| (dir, coord)))
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.0.iter().flatten().count()
    }
}

/// One painted grid unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub coord: CellCoord,
    pub color: Color,
    pub adjacency: AdjacencyMask,
    pub region: RegionId,
    pub neighbors: NeighborLinks,
}

/// Sparse row-major cell storage.
#[derive(Debug, Default)]
pub struct GridStore {
    rows: BTreeMap<i32, BTreeMap<i32, Cell>>,
    len: usize,
}

impl GridStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cell. Never fabricates one.
    #[must_use]
    pub fn get(&self, coord: CellCoord) -> Option<&Cell> {
        self.rows.get(&coord.row)?.get(&coord.col)
    }

    pub fn get_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.rows.get_mut(&coord.row)?.get_mut(&coord.col)
    }

    #[must_use]
    pub fn contains(&self, coord: CellCoord) -> bool {
        self.get(coord).is_some()
    }

    /// Install or overwrite a cell at `cell.coord`, then update its neighbors'
    /// adjacency bits and back-links. Returns the replaced cell, if any.
    pub fn set(&mut self, cell: Cell) -> Option<Cell> {
        let coord = cell.coord;
        let previous = self.rows.entry(coord.row).or_default().insert(coord.col, cell);
        if previous.is_none() {
            self.len += 1;
        }
        adjacency::notify_neighbors(self, coord);
        previous
    }

    /// Links to the existing cardinal neighbors of `coord`.
    #[must_use]
    pub fn neighbors(&self, coord: CellCoord) -> NeighborLinks {
        let mut links = NeighborLinks::default();
        for dir in Direction::ALL {
            let found = coord.step(dir).filter(|n| self.contains(*n));
            links.set(dir, found);
        }
        links
    }

    /// All cells in `(row, col)` order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.values().flat_map(BTreeMap::values)
    }

    /// Coordinates of every cell labeled `region`, in `(row, col)` order.
    #[must_use]
    pub fn region_members(&self, region: RegionId) -> Vec<CellCoord> {
        self.cells()
            .filter(|c| c.region == region)
            .map(|c| c.coord)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Fixed cell size and logical extent used to place cells in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub cell_size: f64,
    pub cols: u32,
    pub rows: u32,
}

impl GridGeometry {
    #[must_use]
    pub fn new(cell_size: f64, cols: u32, rows: u32) -> Self {
        Self { cell_size, cols, rows }
    }

    /// Column and row index (within the logical extent) of cell `(0, 0)`.
    #[must_use]
    pub fn center(&self) -> (i32, i32) {
        (half(self.cols), half(self.rows))
    }

    /// World-space top-left corner of a cell.
    #[must_use]
    pub fn cell_origin(&self, coord: CellCoord) -> Point {
        let (center_col, center_row) = self.center();
        Point {
            x: (f64::from(coord.col) + f64::from(center_col)) * self.cell_size,
            y: (f64::from(coord.row) + f64::from(center_row)) * self.cell_size,
        }
    }

    /// The cell containing a world-space point.
    #[must_use]
    pub fn coord_at(&self, world: Point) -> CellCoord {
        let (center_col, center_row) = self.center();
        let col = to_index((world.x / self.cell_size).floor()).saturating_sub(center_col);
        let row = to_index((world.y / self.cell_size).floor()).saturating_sub(center_row);
        CellCoord { row, col }
    }
}

fn half(n: u32) -> i32 {
    i32::try_from(n / 2).unwrap_or(i32::MAX)
}

/// Saturating float-to-index conversion; NaN maps to 0.
#[allow(clippy::cast_possible_truncation)]
fn to_index(value: f64) -> i32 {
    value as i32
}
