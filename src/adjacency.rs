//! Same-color adjacency: cardinal directions and the 4-bit border mask.
//!
//! A cell's bit for direction `D` is set iff the neighbor in direction `D`
//! exists and has the same color. The renderer draws a border only on sides
//! whose bit is clear, so a fully interior cell (`0b1111`) draws none.

#[cfg(test)]
#[path = "adjacency_test.rs"]
mod adjacency_test;

use bitflags::bitflags;

use crate::color::Color;
use crate::grid::{CellCoord, GridStore};

/// One of the four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in mask-bit order (most significant first).
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// `(row, col)` step toward this direction. Rows grow southward.
    #[must_use]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }

    /// The mask bit for this direction.
    #[must_use]
    pub fn bit(self) -> AdjacencyMask {
        match self {
            Self::North => AdjacencyMask::NORTH,
            Self::East => AdjacencyMask::EAST,
            Self::South => AdjacencyMask::SOUTH,
            Self::West => AdjacencyMask::WEST,
        }
    }

    /// Stable slot index, used for per-direction arrays.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }
}

bitflags! {
    /// Which sides of a cell touch a same-colored neighbor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AdjacencyMask: u8 {
        const NORTH = 0b1000;
        const EAST = 0b0100;
        const SOUTH = 0b0010;
        const WEST = 0b0001;
    }
}

impl AdjacencyMask {
    /// All four sides matched; no border is drawn.
    #[must_use]
    pub fn is_interior(self) -> bool {
        self == Self::all()
    }

    /// Whether the side facing `dir` is matched.
    #[must_use]
    pub fn has(self, dir: Direction) -> bool {
        self.contains(dir.bit())
    }
}

/// Compute the mask `coord` would have if painted `color`, from the live
/// neighbors currently in `store`.
#[must_use]
pub fn compute_mask(store: &GridStore, coord: CellCoord, color: Color) -> AdjacencyMask {
    let mut mask = AdjacencyMask::empty();
    for dir in Direction::ALL {
        let same = coord
            .step(dir)
            .and_then(|n| store.get(n))
            .is_some_and(|n| n.color == color);
        mask.set(dir.bit(), same);
    }
    mask
}

/// Refresh every existing neighbor of `coord` after its color changed.
///
/// Each neighbor's bit facing back toward `coord` is set or cleared by color
/// equality, and its link back to `coord` is re-pointed.
pub fn notify_neighbors(store: &mut GridStore, coord: CellCoord) {
    let Some(color) = store.get(coord).map(|c| c.color) else {
        return;
    };
    for dir in Direction::ALL {
        let Some(neighbor_coord) = coord.step(dir) else {
            continue;
        };
        if let Some(neighbor) = store.get_mut(neighbor_coord) {
            let back = dir.opposite();
            neighbor.adjacency.set(back.bit(), neighbor.color == color);
            neighbor.neighbors.set(back, Some(coord));
        }
    }
}
