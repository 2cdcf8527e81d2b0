//! Rendering: draws the grid to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a read-only view of engine state and produces pixels; it does
//! not mutate any application state.
//!
//! Layers, bottom first: background, grid lines over the visible window plus
//! one cell on each side, cell fills, cell borders (only on sides without a
//! same-colored neighbor), and the hover highlight.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::adjacency::{AdjacencyMask, Direction};
use crate::camera::{Camera, Point};
use crate::consts::{BORDER_WIDTH, GRID_LINE_WIDTH_PX};
use crate::engine::EngineCore;
use crate::grid::{Cell, CellCoord, GridGeometry};

/// Inclusive range of cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min_row: i32,
    pub max_row: i32,
    pub min_col: i32,
    pub max_col: i32,
}

/// Cells visible on a `width`×`height` canvas, extended one cell past each
/// edge. The store is unbounded, so the range follows the camera wherever it
/// has panned.
#[must_use]
pub fn visible_cell_range(geometry: &GridGeometry, camera: &Camera, width: f64, height: f64) -> CellRange {
    let (top_left, bottom_right) = camera.visible_world(width, height);
    let first = geometry.coord_at(top_left);
    let last = geometry.coord_at(bottom_right);
    CellRange {
        min_row: first.row.saturating_sub(1),
        max_row: last.row.saturating_add(1),
        min_col: first.col.saturating_sub(1),
        max_col: last.col.saturating_add(1),
    }
}

/// Sides of a cell that get a border: those without a same-colored neighbor.
pub fn border_sides(mask: AdjacencyMask) -> impl Iterator<Item = Direction> {
    Direction::ALL.into_iter().filter(move |d| !mask.has(*d))
}

/// World-space endpoints of the border on side `dir` of `coord`, inset by
/// half the border width so neighboring strokes don't overlap.
#[must_use]
pub fn border_segment(geometry: &GridGeometry, coord: CellCoord, dir: Direction) -> (Point, Point) {
    let origin = geometry.cell_origin(coord);
    let inset = BORDER_WIDTH / 2.0;
    let left = origin.x + inset;
    let top = origin.y + inset;
    let right = origin.x + geometry.cell_size - inset;
    let bottom = origin.y + geometry.cell_size - inset;
    match dir {
        Direction::North => (Point::new(left, top), Point::new(right, top)),
        Direction::East => (Point::new(right, top), Point::new(right, bottom)),
        Direction::South => (Point::new(left, bottom), Point::new(right, bottom)),
        Direction::West => (Point::new(left, top), Point::new(left, bottom)),
    }
}

/// Draw the full scene.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let camera = &core.camera;
    let (width, height) = (core.viewport_width, core.viewport_height);

    // Layer 1: clear and set up transforms.
    ctx.set_transform(core.dpr, 0.0, 0.0, core.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str(&core.config.background.to_hex());
    ctx.fill_rect(0.0, 0.0, width, height);
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    // Layer 2: background grid lines.
    draw_grid_lines(ctx, core, visible_cell_range(&core.geometry, camera, width, height));

    // Layer 3: cell fills.
    for cell in core.grid.cells() {
        draw_cell(ctx, &core.geometry, cell);
    }

    // Layer 4: borders on unmatched sides.
    ctx.set_line_width(BORDER_WIDTH);
    for cell in core.grid.cells() {
        draw_borders(ctx, &core.geometry, cell, core.config.shade_step);
    }

    // Layer 5: hover highlight.
    if let Some(hover) = core.input.hover {
        let origin = core.geometry.cell_origin(hover);
        ctx.set_fill_style_str(&core.config.hover_color);
        ctx.fill_rect(origin.x, origin.y, core.geometry.cell_size, core.geometry.cell_size);
    }

    Ok(())
}

fn draw_grid_lines(ctx: &CanvasRenderingContext2d, core: &EngineCore, range: CellRange) {
    let geometry = &core.geometry;
    let top_left = geometry.cell_origin(CellCoord::new(range.min_row, range.min_col));
    let far = geometry.cell_origin(CellCoord::new(range.max_row, range.max_col));
    let bottom_right = Point::new(far.x + geometry.cell_size, far.y + geometry.cell_size);

    ctx.set_stroke_style_str(&core.config.grid_line_color.to_hex());
    ctx.set_line_width(core.camera.canvas_dist_to_world(GRID_LINE_WIDTH_PX));
    ctx.begin_path();
    for col in range.min_col..=range.max_col.saturating_add(1) {
        let x = geometry.cell_origin(CellCoord::new(range.min_row, col)).x;
        ctx.move_to(x, top_left.y);
        ctx.line_to(x, bottom_right.y);
    }
    for row in range.min_row..=range.max_row.saturating_add(1) {
        let y = geometry.cell_origin(CellCoord::new(row, range.min_col)).y;
        ctx.move_to(top_left.x, y);
        ctx.line_to(bottom_right.x, y);
    }
    ctx.stroke();
}

fn draw_cell(ctx: &CanvasRenderingContext2d, geometry: &GridGeometry, cell: &Cell) {
    let origin = geometry.cell_origin(cell.coord);
    ctx.set_fill_style_str(&cell.color.to_hex());
    ctx.fill_rect(origin.x, origin.y, geometry.cell_size, geometry.cell_size);
}

fn draw_borders(ctx: &CanvasRenderingContext2d, geometry: &GridGeometry, cell: &Cell, shade_step: u8) {
    if cell.adjacency.is_interior() {
        return;
    }
    ctx.set_stroke_style_str(&cell.color.shade(shade_step).to_hex());
    ctx.begin_path();
    for dir in border_sides(cell.adjacency) {
        let (from, to) = border_segment(geometry, cell.coord, dir);
        ctx.move_to(from.x, from.y);
        ctx.line_to(to.x, to.y);
    }
    ctx.stroke();
}
