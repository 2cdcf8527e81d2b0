use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, Point};
use crate::color::Color;
use crate::config::{ConfigError, GridConfig};
use crate::grid::{Cell, CellCoord, GridGeometry, GridStore};
use crate::input::{Button, CursorMode, InputState, Routing};
use crate::paint::{self, PaintOutcome};
use crate::region::{RegionId, RegionTracker};
use crate::render;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Cursor shown while no drag is active.
const CURSOR_IDLE: &str = "crosshair";

/// Cursor shown while panning.
const CURSOR_PANNING: &str = "grabbing";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The view is dirty; the next frame tick will redraw it.
    RenderNeeded,
    /// Route pointer events from the whole window until released.
    CapturePointer,
    /// Route pointer events back to the drawing surface.
    ReleasePointer,
    SetCursor(&'static str),
}

/// Fatal construction errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("drawing surface not found: {0}")]
    MissingSurface(String),
    #[error("2d drawing context unavailable")]
    ContextUnavailable,
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

/// One row of the diagnostic cell dump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSnapshot {
    pub row: i32,
    pub col: i32,
    pub key: String,
    pub color: Color,
    pub adjacency: u8,
    pub region: RegionId,
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        Self {
            row: cell.coord.row,
            col: cell.coord.col,
            key: cell.coord.key(),
            color: cell.color,
            adjacency: cell.adjacency.bits(),
            region: cell.region,
        }
    }
}

/// Core engine state: all logic that does not depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
/// The grid, region counter, camera, and dirty flag are owned here and only
/// mutated synchronously from the handlers below.
pub struct EngineCore {
    pub config: GridConfig,
    pub geometry: GridGeometry,
    pub grid: GridStore,
    pub regions: RegionTracker,
    pub camera: Camera,
    pub input: InputState,
    pub active_color: Color,
    pub dirty: bool,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(GridConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: GridConfig) -> Self {
        Self {
            geometry: config.geometry(),
            grid: GridStore::new(),
            regions: RegionTracker::new(),
            camera: Camera::with_bounds(config.min_scale, config.max_scale),
            input: InputState::default(),
            active_color: config.initial_color,
            dirty: true,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            config,
        }
    }

    // --- Host inputs ---

    /// Set the color used by subsequent paints.
    pub fn set_active_color(&mut self, color: Color) {
        self.active_color = color;
    }

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.dpr = dpr;
        self.dirty = true;
    }

    /// Record where the surface's top-left corner sits in the viewport.
    pub fn set_surface_origin(&mut self, origin: Point) {
        self.camera.origin = origin;
    }

    // --- Paint ---

    /// Paint `coord` with the active color, marking the view dirty if anything changed.
    pub fn paint_at(&mut self, coord: CellCoord) -> PaintOutcome {
        let outcome = paint::paint_cell(&mut self.grid, &mut self.regions, coord, self.active_color);
        if outcome.changed() {
            self.dirty = true;
        }
        outcome
    }

    // --- Input events ---

    /// Primary starts painting (and paints under the pointer); middle starts
    /// panning. Every other button is ignored.
    pub fn on_pointer_down(&mut self, viewport_pt: Point, button: Button) -> Vec<Action> {
        let mut actions = Vec::new();
        match button {
            Button::Primary => {
                self.begin_drag(CursorMode::Paint, viewport_pt, &mut actions);
                let coord = self.coord_at(viewport_pt);
                self.paint_at(coord);
            }
            Button::Middle => {
                self.begin_drag(CursorMode::Pan, viewport_pt, &mut actions);
                actions.push(Action::SetCursor(CURSOR_PANNING));
            }
            Button::Secondary | Button::Other => return actions,
        }
        self.update_hover(viewport_pt);
        self.push_render(&mut actions);
        actions
    }

    /// Handle a pointer move.
    ///
    /// `coalesced` holds the sub-events the platform batched into this one, in
    /// chronological order. In `Paint` mode every one of them is painted; when
    /// it is empty the event's own point is used.
    pub fn on_pointer_move(&mut self, viewport_pt: Point, coalesced: &[Point]) -> Vec<Action> {
        let mut actions = Vec::new();
        match self.input.mode {
            CursorMode::Paint => {
                let samples = if coalesced.is_empty() { std::slice::from_ref(&viewport_pt) } else { coalesced };
                for sample in samples {
                    let coord = self.coord_at(*sample);
                    self.paint_at(coord);
                }
            }
            CursorMode::Pan => {
                if let Some(last) = self.input.last_viewport {
                    self.camera.pan_by(viewport_pt.x - last.x, viewport_pt.y - last.y);
                    self.dirty = true;
                }
            }
            CursorMode::Rest | CursorMode::Erase => {}
        }
        self.input.last_viewport = Some(viewport_pt);
        self.update_hover(viewport_pt);
        self.push_render(&mut actions);
        actions
    }

    /// Any button release returns to `Rest` and releases window routing.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        let was_panning = self.input.mode == CursorMode::Pan;
        self.input.mode = CursorMode::Rest;
        self.input.last_viewport = None;
        if self.input.routing == Routing::Window {
            self.input.routing = Routing::Surface;
            actions.push(Action::ReleasePointer);
        }
        if was_panning {
            actions.push(Action::SetCursor(CURSOR_IDLE));
        }
        actions
    }

    /// Clear the hover highlight when the pointer leaves the surface, unless a
    /// drag is still tracking it.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.is_dragging() {
            return actions;
        }
        self.input.hover = None;
        self.dirty = true;
        self.push_render(&mut actions);
        actions
    }

    /// Zoom toward the pointer. Positive `delta_y` (scroll down) zooms out.
    pub fn on_wheel(&mut self, viewport_pt: Point, delta_y: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        let scale_delta = -delta_y * self.config.zoom_sensitivity;
        if self.camera.zoom_at(viewport_pt, scale_delta) {
            log::debug!("zoom {:.3} at ({:.1}, {:.1})", self.camera.zoom, viewport_pt.x, viewport_pt.y);
            self.dirty = true;
        }
        self.update_hover(viewport_pt);
        self.push_render(&mut actions);
        actions
    }

    // --- Render gate ---

    /// Read and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // --- Queries ---

    /// The cell under a viewport point.
    #[must_use]
    pub fn coord_at(&self, viewport_pt: Point) -> CellCoord {
        self.geometry.coord_at(self.camera.viewport_to_world(viewport_pt))
    }

    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.grid.get(coord)
    }

    /// Every stored cell in `(row, col)` order, for diagnostic dumps.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CellSnapshot> {
        self.grid.cells().map(CellSnapshot::from).collect()
    }

    // --- Internals ---

    fn begin_drag(&mut self, mode: CursorMode, viewport_pt: Point, actions: &mut Vec<Action>) {
        self.input.mode = mode;
        self.input.last_viewport = Some(viewport_pt);
        if self.input.routing == Routing::Surface {
            self.input.routing = Routing::Window;
            actions.push(Action::CapturePointer);
        }
    }

    fn update_hover(&mut self, viewport_pt: Point) {
        let coord = self.coord_at(viewport_pt);
        if self.input.hover != Some(coord) {
            self.input.hover = Some(coord);
            self.dirty = true;
        }
    }

    fn push_render(&self, actions: &mut Vec<Action>) {
        if self.dirty {
            actions.push(Action::RenderNeeded);
        }
    }
}

/// The full engine. Wraps `EngineCore` and owns the canvas element and its 2D context.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Bind an engine to a canvas element.
    ///
    /// # Errors
    ///
    /// Fails when the canvas is absent or its 2D context cannot be acquired;
    /// the engine cannot run without either.
    pub fn new(canvas: Option<HtmlCanvasElement>, config: GridConfig) -> Result<Self, EngineError> {
        let canvas = canvas.ok_or_else(|| EngineError::MissingSurface("no canvas element".into()))?;
        let ctx = match canvas.get_context("2d") {
            Ok(Some(obj)) => obj
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| EngineError::ContextUnavailable)?,
            Ok(None) | Err(_) => return Err(EngineError::ContextUnavailable),
        };

        let mut core = EngineCore::with_config(config);
        core.set_viewport(f64::from(canvas.width()), f64::from(canvas.height()), 1.0);
        Ok(Self { canvas, ctx, core })
    }

    /// Look up a canvas element by id and bind to it.
    ///
    /// # Errors
    ///
    /// See [`Engine::new`]; a missing document or element is `MissingSurface`.
    pub fn from_element_id(id: &str, config: GridConfig) -> Result<Self, EngineError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| EngineError::MissingSurface("no document".into()))?;
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| EngineError::MissingSurface(id.to_string()))?;
        let canvas = element
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| EngineError::MissingSurface(format!("{id} is not a canvas")))?;
        Self::new(Some(canvas), config)
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Re-read the surface's on-screen position so viewport points convert correctly.
    pub fn sync_surface_origin(&mut self) {
        let rect = self.canvas.get_bounding_client_rect();
        self.core.set_surface_origin(Point::new(rect.left(), rect.top()));
    }

    /// One frame tick: redraw if dirty. Returns whether anything was drawn.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a `Canvas2D` call fails. The dirty flag is restored so
    /// the next tick retries.
    pub fn render(&mut self) -> Result<bool, JsValue> {
        if !self.core.take_dirty() {
            return Ok(false);
        }
        if let Err(err) = render::draw(&self.ctx, &self.core) {
            self.core.dirty = true;
            return Err(err);
        }
        Ok(true)
    }
}
