//! The paint operation: recolor one cell and keep adjacency and regions current.

#[cfg(test)]
#[path = "paint_test.rs"]
mod paint_test;

use crate::adjacency;
use crate::color::Color;
use crate::grid::{Cell, CellCoord, GridStore};
use crate::region::{self, RegionId, RegionTracker};

/// Result of a paint request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOutcome {
    /// The cell already had the requested color; nothing changed.
    Unchanged,
    /// The cell was created or recolored.
    Painted {
        /// Region id now carried by the cell's component.
        region: RegionId,
        /// Whether `region` was freshly allocated for this paint.
        fresh_region: bool,
        /// Cells relabeled by the flood fill, including the painted cell.
        relabeled: usize,
    },
}

impl PaintOutcome {
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, Self::Painted { .. })
    }
}

/// Paint `coord` with `color`.
///
/// Creates the cell on first paint. Computes the new cell's region and mask
/// from its live neighbors, stores it (which updates the neighbors' bits),
/// then flood-fills the region id across the connected same-colored cells.
pub fn paint_cell(store: &mut GridStore, regions: &mut RegionTracker, coord: CellCoord, color: Color) -> PaintOutcome {
    if store.get(coord).is_some_and(|c| c.color == color) {
        return PaintOutcome::Unchanged;
    }

    let neighbors = store.neighbors(coord);
    let like = region::like_regions(store, coord, color);
    let (region_id, fresh_region) = regions.adopt(&like);
    let mask = adjacency::compute_mask(store, coord, color);

    store.set(Cell { coord, color, adjacency: mask, region: region_id, neighbors });
    let relabeled = region::flood_fill(store, coord, region_id);

    log::debug!(
        "painted {coord} {color} region={region_id} fresh={fresh_region} merged={} relabeled={relabeled}",
        like.len()
    );

    PaintOutcome::Painted { region: region_id, fresh_region, relabeled }
}
