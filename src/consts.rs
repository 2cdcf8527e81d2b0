//! Shared numeric constants for the pixel grid.

use crate::color::Color;

// ── Grid geometry ───────────────────────────────────────────────

/// Size of one cell in world units.
pub const CELL_SIZE: f64 = 20.0;

/// Logical grid width in cells. Cell column 0 sits at the middle.
pub const GRID_COLS: u32 = 300;

/// Logical grid height in cells. Cell row 0 sits at the middle.
pub const GRID_ROWS: u32 = 300;

// ── Camera ──────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const MIN_SCALE: f64 = 0.3;

/// Largest allowed zoom factor.
pub const MAX_SCALE: f64 = 3.0;

/// Scale delta applied per unit of wheel `delta_y`.
pub const ZOOM_SENSITIVITY: f64 = 0.001;

// ── Rendering ───────────────────────────────────────────────────

/// Per-channel amount subtracted from a cell color to draw its border.
pub const SHADE_STEP: u8 = 40;

/// Border line width in world units.
pub const BORDER_WIDTH: f64 = 2.0;

/// Background grid line width in screen pixels.
pub const GRID_LINE_WIDTH_PX: f64 = 1.0;

// ── Colors ──────────────────────────────────────────────────────

pub const DEFAULT_COLOR: Color = Color::BLACK;
pub const DEFAULT_BACKGROUND: Color = Color::WHITE;
pub const DEFAULT_GRID_LINE_COLOR: Color = Color::rgb(224, 224, 224);

/// CSS fill for the hover overlay; needs alpha, so it stays a string.
pub const DEFAULT_HOVER_COLOR: &str = "rgba(0, 0, 0, 0.15)";
