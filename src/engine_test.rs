#![allow(clippy::float_cmp)]

use super::*;
use crate::adjacency::AdjacencyMask;
use crate::consts::{MAX_SCALE, MIN_SCALE};

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Viewport point at the middle of `coord` under the engine's current camera.
fn center_of(core: &EngineCore, row: i32, col: i32) -> Point {
    let origin = core.geometry.cell_origin(CellCoord::new(row, col));
    let half = core.geometry.cell_size / 2.0;
    core.camera.world_to_viewport(pt(origin.x + half, origin.y + half))
}

fn region_of(core: &EngineCore, row: i32, col: i32) -> Option<RegionId> {
    core.cell(CellCoord::new(row, col)).map(|c| c.region)
}

const RED: Color = Color::rgb(255, 0, 0);

// =============================================================
// Construction
// =============================================================

#[test]
fn new_core_defaults() {
    let core = EngineCore::new();
    assert!(core.grid.is_empty());
    assert_eq!(core.input.mode, CursorMode::Rest);
    assert_eq!(core.active_color, Color::BLACK);
    assert_eq!(core.camera.zoom, 1.0);
    assert_eq!(core.regions.next_id(), 0);
    assert!(core.dirty);
}

#[test]
fn with_config_applies_bounds_and_color() {
    let config = GridConfig { min_scale: 0.5, max_scale: 2.0, initial_color: RED, ..GridConfig::default() };
    let core = EngineCore::with_config(config);
    assert_eq!(core.camera.min_zoom, 0.5);
    assert_eq!(core.camera.max_zoom, 2.0);
    assert_eq!(core.active_color, RED);
}

#[test]
fn take_dirty_clears_flag() {
    let mut core = EngineCore::new();
    assert!(core.take_dirty());
    assert!(!core.take_dirty());
}

#[test]
fn set_viewport_marks_dirty() {
    let mut core = EngineCore::new();
    core.take_dirty();
    core.set_viewport(800.0, 600.0, 2.0);
    assert!(core.dirty);
    assert_eq!(core.viewport_width, 800.0);
    assert_eq!(core.dpr, 2.0);
}

// =============================================================
// Pointer down
// =============================================================

#[test]
fn primary_down_paints_and_captures() {
    let mut core = EngineCore::new();
    core.take_dirty();
    let at = center_of(&core, 0, 0);
    let actions = core.on_pointer_down(at, Button::Primary);

    assert_eq!(core.input.mode, CursorMode::Paint);
    assert_eq!(actions, vec![Action::CapturePointer, Action::RenderNeeded]);
    assert_eq!(core.cell(CellCoord::new(0, 0)).map(|c| c.color), Some(Color::BLACK));
    assert!(core.input.is_dragging());
}

#[test]
fn primary_down_uses_active_color() {
    let mut core = EngineCore::new();
    core.set_active_color(RED);
    core.on_pointer_down(center_of(&core, 2, -3), Button::Primary);
    assert_eq!(core.cell(CellCoord::new(2, -3)).map(|c| c.color), Some(RED));
}

#[test]
fn middle_down_starts_pan() {
    let mut core = EngineCore::new();
    let actions = core.on_pointer_down(pt(10.0, 10.0), Button::Middle);
    assert_eq!(core.input.mode, CursorMode::Pan);
    assert!(actions.contains(&Action::CapturePointer));
    assert!(actions.contains(&Action::SetCursor("grabbing")));
    assert!(core.grid.is_empty());
}

#[test]
fn secondary_down_is_ignored() {
    let mut core = EngineCore::new();
    core.take_dirty();
    let actions = core.on_pointer_down(pt(10.0, 10.0), Button::Secondary);
    assert!(actions.is_empty());
    assert_eq!(core.input.mode, CursorMode::Rest);
    assert!(core.grid.is_empty());
    assert!(!core.dirty);
}

#[test]
fn back_and_forward_buttons_are_ignored() {
    for dom_button in [3, 4] {
        let mut core = EngineCore::new();
        core.take_dirty();
        let actions = core.on_pointer_down(center_of(&core, 0, 0), Button::from_dom(dom_button));
        assert!(actions.is_empty());
        assert_eq!(core.input.mode, CursorMode::Rest);
        assert!(!core.input.is_dragging());
        assert!(core.grid.is_empty());
    }
}

#[test]
fn second_down_while_dragging_does_not_recapture() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    let actions = core.on_pointer_down(pt(10.0, 10.0), Button::Middle);
    assert!(!actions.contains(&Action::CapturePointer));
    assert_eq!(core.input.mode, CursorMode::Pan);
}

// =============================================================
// Pointer move
// =============================================================

#[test]
fn move_while_resting_only_hovers() {
    let mut core = EngineCore::new();
    let at = center_of(&core, 1, 1);
    core.on_pointer_move(at, &[]);
    assert!(core.grid.is_empty());
    assert_eq!(core.input.hover, Some(CellCoord::new(1, 1)));
}

#[test]
fn move_while_painting_paints_every_coalesced_sample_in_order() {
    let mut core = EngineCore::new();
    core.on_pointer_down(center_of(&core, 5, 5), Button::Primary);

    let samples = [center_of(&core, 0, 0), center_of(&core, 0, 5), center_of(&core, 0, 10)];
    core.on_pointer_move(samples[2], &samples);

    assert_eq!(core.grid.len(), 4);
    assert_eq!(region_of(&core, 5, 5), Some(0));
    assert_eq!(region_of(&core, 0, 0), Some(1));
    assert_eq!(region_of(&core, 0, 5), Some(2));
    assert_eq!(region_of(&core, 0, 10), Some(3));
}

#[test]
fn move_while_painting_without_coalesced_uses_event_point() {
    let mut core = EngineCore::new();
    core.on_pointer_down(center_of(&core, 0, 0), Button::Primary);
    core.on_pointer_move(center_of(&core, 0, 1), &[]);
    assert_eq!(core.grid.len(), 2);
    assert_eq!(
        core.cell(CellCoord::new(0, 0)).map(|c| c.adjacency),
        Some(AdjacencyMask::EAST)
    );
}

#[test]
fn move_while_panning_pans_one_to_one() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(100.0, 100.0), Button::Middle);
    core.take_dirty();
    let actions = core.on_pointer_move(pt(130.0, 90.0), &[]);
    assert_eq!(core.camera.pan_x, 30.0);
    assert_eq!(core.camera.pan_y, -10.0);
    assert!(actions.contains(&Action::RenderNeeded));
    assert!(core.grid.is_empty());

    core.on_pointer_move(pt(140.0, 90.0), &[]);
    assert_eq!(core.camera.pan_x, 40.0);
}

#[test]
fn pan_is_unaffected_by_zoom() {
    let mut core = EngineCore::new();
    core.on_wheel(pt(0.0, 0.0), -1000.0);
    assert_eq!(core.camera.zoom, 2.0);
    core.on_pointer_down(pt(0.0, 0.0), Button::Middle);
    core.on_pointer_move(pt(25.0, 0.0), &[]);
    assert_eq!(core.camera.pan_x, 25.0);
}

// =============================================================
// Pointer up / leave
// =============================================================

#[test]
fn up_after_paint_releases() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    let actions = core.on_pointer_up();
    assert_eq!(actions, vec![Action::ReleasePointer]);
    assert_eq!(core.input.mode, CursorMode::Rest);
    assert!(!core.input.is_dragging());
    assert_eq!(core.input.last_viewport, None);
}

#[test]
fn up_after_pan_restores_cursor() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(10.0, 10.0), Button::Middle);
    let actions = core.on_pointer_up();
    assert_eq!(actions, vec![Action::ReleasePointer, Action::SetCursor("crosshair")]);
}

#[test]
fn up_without_drag_is_quiet() {
    let mut core = EngineCore::new();
    assert!(core.on_pointer_up().is_empty());
}

#[test]
fn move_after_up_does_not_paint() {
    let mut core = EngineCore::new();
    core.on_pointer_down(center_of(&core, 0, 0), Button::Primary);
    core.on_pointer_up();
    core.on_pointer_move(center_of(&core, 0, 1), &[]);
    assert_eq!(core.grid.len(), 1);
}

#[test]
fn leave_clears_hover_when_resting() {
    let mut core = EngineCore::new();
    core.on_pointer_move(pt(10.0, 10.0), &[]);
    core.take_dirty();
    let actions = core.on_pointer_leave();
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(core.input.hover, None);
}

#[test]
fn leave_during_drag_is_ignored() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    let hover = core.input.hover;
    assert!(core.on_pointer_leave().is_empty());
    assert_eq!(core.input.hover, hover);
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn wheel_up_zooms_in_additively() {
    let mut core = EngineCore::new();
    core.take_dirty();
    let actions = core.on_wheel(pt(0.0, 0.0), -500.0);
    assert!((core.camera.zoom - 1.5).abs() < 1e-9);
    assert!(actions.contains(&Action::RenderNeeded));
}

#[test]
fn wheel_clamps_to_bounds() {
    let mut core = EngineCore::new();
    core.on_wheel(pt(0.0, 0.0), 1_000_000.0);
    assert_eq!(core.camera.zoom, MIN_SCALE);
    core.on_wheel(pt(0.0, 0.0), -1_000_000.0);
    assert_eq!(core.camera.zoom, MAX_SCALE);
}

#[test]
fn wheel_keeps_cell_under_pointer() {
    let mut core = EngineCore::new();
    let at = center_of(&core, 3, 4);
    core.on_wheel(at, -700.0);
    assert_eq!(core.coord_at(at), CellCoord::new(3, 4));
}

#[test]
fn wheel_at_bound_does_not_dirty_camera() {
    let mut core = EngineCore::new();
    core.on_wheel(pt(0.0, 0.0), 1_000_000.0);
    let before = core.camera;
    core.take_dirty();
    core.on_wheel(pt(0.0, 0.0), 1_000.0);
    assert_eq!(core.camera.zoom, before.zoom);
    assert_eq!(core.camera.pan_x, before.pan_x);
    assert!(!core.dirty);
}

// =============================================================
// Surface origin
// =============================================================

#[test]
fn surface_origin_offsets_hit_testing() {
    let mut core = EngineCore::new();
    let at = center_of(&core, 0, 0);
    core.set_surface_origin(pt(50.0, 80.0));
    assert_eq!(core.coord_at(pt(at.x + 50.0, at.y + 80.0)), CellCoord::new(0, 0));
}

// =============================================================
// Snapshot
// =============================================================

#[test]
fn snapshot_lists_cells_in_row_col_order() {
    let mut core = EngineCore::new();
    core.paint_at(CellCoord::new(1, 0));
    core.paint_at(CellCoord::new(0, 2));
    core.paint_at(CellCoord::new(0, 1));
    let keys: Vec<_> = core.snapshot().into_iter().map(|s| s.key).collect();
    assert_eq!(keys, vec!["0.1", "0.2", "1.0"]);
}

#[test]
fn snapshot_serializes_colors_as_hex() {
    let mut core = EngineCore::new();
    core.set_active_color(RED);
    core.paint_at(CellCoord::new(0, 0));
    let json = serde_json::to_value(core.snapshot()).unwrap();
    assert_eq!(json[0]["color"], "#ff0000");
    assert_eq!(json[0]["key"], "0.0");
    assert_eq!(json[0]["adjacency"], 0);
    assert_eq!(json[0]["region"], 0);
}

#[test]
fn paint_at_same_color_does_not_dirty() {
    let mut core = EngineCore::new();
    core.paint_at(CellCoord::new(0, 0));
    core.take_dirty();
    assert_eq!(core.paint_at(CellCoord::new(0, 0)), PaintOutcome::Unchanged);
    assert!(!core.dirty);
}
