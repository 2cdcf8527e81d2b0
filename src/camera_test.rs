#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn cam(pan_x: f64, pan_y: f64, zoom: f64) -> Camera {
    Camera { pan_x, pan_y, zoom, ..Camera::default() }
}

// --- Defaults ---

#[test]
fn camera_default_is_identity() {
    let c = Camera::default();
    assert_eq!(c.pan_x, 0.0);
    assert_eq!(c.pan_y, 0.0);
    assert_eq!(c.zoom, 1.0);
    assert_eq!(c.origin, Point::new(0.0, 0.0));
}

#[test]
fn camera_default_bounds() {
    let c = Camera::default();
    assert_eq!(c.min_zoom, 0.3);
    assert_eq!(c.max_zoom, 3.0);
}

#[test]
fn camera_with_bounds_keeps_identity() {
    let c = Camera::with_bounds(0.5, 2.0);
    assert_eq!(c.zoom, 1.0);
    assert_eq!(c.min_zoom, 0.5);
    assert_eq!(c.max_zoom, 2.0);
}

// --- canvas_to_world ---

#[test]
fn canvas_to_world_identity() {
    let world = Camera::default().canvas_to_world(Point::new(50.0, 75.0));
    assert!(point_approx_eq(world, Point::new(50.0, 75.0)));
}

#[test]
fn canvas_to_world_with_pan_and_zoom() {
    // (20 - 20) / 2 = 0, (10 - 10) / 2 = 0
    let world = cam(20.0, 10.0, 2.0).canvas_to_world(Point::new(20.0, 10.0));
    assert!(point_approx_eq(world, Point::new(0.0, 0.0)));
}

#[test]
fn canvas_to_world_origin() {
    let world = cam(50.0, 30.0, 2.0).canvas_to_world(Point::new(0.0, 0.0));
    assert!(point_approx_eq(world, Point::new(-25.0, -15.0)));
}

#[test]
fn world_to_canvas_with_pan_and_zoom() {
    let canvas = cam(20.0, 10.0, 3.0).world_to_canvas(Point::new(5.0, 5.0));
    assert!(point_approx_eq(canvas, Point::new(35.0, 25.0)));
}

// --- viewport ---

#[test]
fn viewport_to_world_subtracts_origin() {
    let mut c = cam(0.0, 0.0, 1.0);
    c.origin = Point::new(100.0, 40.0);
    let world = c.viewport_to_world(Point::new(110.0, 50.0));
    assert!(point_approx_eq(world, Point::new(10.0, 10.0)));
}

#[test]
fn viewport_round_trip_any_state() {
    let states = [
        (0.0, 0.0, 1.0, 0.0, 0.0),
        (13.7, -42.3, 0.75, 8.0, 120.0),
        (-500.0, 250.0, 2.9, -3.0, 0.5),
        (1e4, -1e4, 0.3, 64.0, 64.0),
    ];
    let points = [Point::new(0.0, 0.0), Point::new(400.0, 300.0), Point::new(-17.5, 1234.25)];
    for (px, py, zoom, ox, oy) in states {
        let mut c = cam(px, py, zoom);
        c.origin = Point::new(ox, oy);
        for p in points {
            let back = c.world_to_viewport(c.viewport_to_world(p));
            assert!(point_approx_eq(p, back), "{p:?} -> {back:?} with {c:?}");
        }
    }
}

#[test]
fn canvas_dist_to_world_ignores_pan() {
    let c = cam(999.0, -999.0, 4.0);
    assert!(approx_eq(c.canvas_dist_to_world(8.0), 2.0));
}

// --- pan_by ---

#[test]
fn pan_by_moves_content_with_pointer() {
    let mut c = cam(0.0, 0.0, 2.0);
    let world = Point::new(10.0, 10.0);
    let before = c.world_to_canvas(world);
    c.pan_by(15.0, -5.0);
    let after = c.world_to_canvas(world);
    assert!(approx_eq(after.x - before.x, 15.0));
    assert!(approx_eq(after.y - before.y, -5.0));
}

#[test]
fn pan_by_zero_is_noop() {
    let mut c = cam(3.0, 4.0, 1.5);
    c.pan_by(0.0, 0.0);
    assert_eq!(c.pan_x, 3.0);
    assert_eq!(c.pan_y, 4.0);
}

// --- zoom_at ---

#[test]
fn zoom_at_keeps_world_point_under_cursor() {
    let mut c = cam(37.0, -12.0, 1.2);
    c.origin = Point::new(5.0, 9.0);
    let cursor = Point::new(321.0, 123.0);
    let before = c.viewport_to_world(cursor);
    assert!(c.zoom_at(cursor, 0.5));
    let after = c.viewport_to_world(cursor);
    assert!(point_approx_eq(before, after));
    assert!(approx_eq(c.zoom, 1.7));
}

#[test]
fn zoom_at_clamps_to_max() {
    let mut c = Camera::default();
    c.zoom_at(Point::new(0.0, 0.0), 1000.0);
    assert_eq!(c.zoom, 3.0);
}

#[test]
fn zoom_at_clamps_to_min() {
    let mut c = Camera::default();
    c.zoom_at(Point::new(0.0, 0.0), -1000.0);
    assert_eq!(c.zoom, 0.3);
}

#[test]
fn zoom_never_leaves_bounds() {
    let mut c = Camera::default();
    let deltas = [0.7, -2.0, 5.0, f64::INFINITY, f64::NEG_INFINITY, 0.01, -0.01, f64::NAN, 1e-12];
    for d in deltas.iter().cycle().take(90) {
        c.zoom_at(Point::new(17.0, 33.0), *d);
        assert!(c.zoom >= c.min_zoom && c.zoom <= c.max_zoom, "zoom {} out of bounds", c.zoom);
    }
}

#[test]
fn zoom_at_at_bound_reports_unchanged() {
    let mut c = cam(10.0, 10.0, 3.0);
    assert!(!c.zoom_at(Point::new(50.0, 50.0), 1.0));
    assert_eq!(c.pan_x, 10.0);
    assert_eq!(c.pan_y, 10.0);
}

#[test]
fn zoom_at_nan_is_ignored() {
    let mut c = Camera::default();
    assert!(!c.zoom_at(Point::new(1.0, 1.0), f64::NAN));
    assert_eq!(c.zoom, 1.0);
}

// --- visible_world ---

#[test]
fn visible_world_inverts_transform() {
    let c = cam(100.0, 50.0, 2.0);
    let (tl, br) = c.visible_world(800.0, 600.0);
    assert!(point_approx_eq(tl, Point::new(-50.0, -25.0)));
    assert!(point_approx_eq(br, Point::new(350.0, 275.0)));
}
