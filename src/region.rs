//! Region labeling: contiguous same-colored cells share one integer id.
//!
//! On every paint the new cell adopts an id from an adjacent same-colored
//! region (or a fresh one), and a flood fill relabels everything reachable
//! through same-colored neighbors. This merges components that the new cell
//! connects.
//!
//! Limitation: regions are never split. Repainting a cell so that it cuts a
//! region in two leaves both halves with the old id; ids only merge forward.

#[cfg(test)]
#[path = "region_test.rs"]
mod region_test;

use std::collections::{BTreeSet, HashSet};

use crate::adjacency::Direction;
use crate::color::Color;
use crate::grid::{CellCoord, GridStore};

/// Region identifier.
pub type RegionId = u64;

/// Allocates region ids. One tracker per grid; never shared globally.
#[derive(Debug, Default)]
pub struct RegionTracker {
    next_id: RegionId,
}

impl RegionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next fresh allocation will return.
    #[must_use]
    pub fn next_id(&self) -> RegionId {
        self.next_id
    }

    /// Take a fresh id from the monotonic counter.
    pub fn allocate(&mut self) -> RegionId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Pick the id a cell painted next to `like` regions should carry.
    ///
    /// Adopts the smallest adjacent id, or allocates a fresh one when there
    /// is none. Returns `(id, fresh)`.
    pub fn adopt(&mut self, like: &BTreeSet<RegionId>) -> (RegionId, bool) {
        match like.first() {
            Some(&id) => (id, false),
            None => (self.allocate(), true),
        }
    }
}

/// Distinct region ids among the neighbors of `coord` that have `color`.
#[must_use]
pub fn like_regions(store: &GridStore, coord: CellCoord, color: Color) -> BTreeSet<RegionId> {
    Direction::ALL
        .into_iter()
        .filter_map(|dir| coord.step(dir))
        .filter_map(|n| store.get(n))
        .filter(|n| n.color == color)
        .map(|n| n.region)
        .collect()
}

/// Relabel the same-colored component containing `start` with `region`.
///
/// Depth-first over an explicit stack; stops at absent cells and color
/// mismatches. Returns the number of cells visited and relabeled.
pub fn flood_fill(store: &mut GridStore, start: CellCoord, region: RegionId) -> usize {
    let Some(color) = store.get(start).map(|c| c.color) else {
        return 0;
    };

    let mut visited = HashSet::new();
    let mut stack = vec![start];
    let mut relabeled = 0;
    while let Some(coord) = stack.pop() {
        if !visited.insert(coord) {
            continue;
        }
        let Some(cell) = store.get_mut(coord) else {
            continue;
        };
        if cell.color != color {
            continue;
        }
        cell.region = region;
        relabeled += 1;

        for dir in Direction::ALL {
            if let Some(next) = coord.step(dir) {
                if !visited.contains(&next) && store.contains(next) {
                    stack.push(next);
                }
            }
        }
    }

    relabeled
}
