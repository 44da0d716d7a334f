#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::consts::{WORKSPACE_PADDING, ZOOM_STEP};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn viewport(zoom: f64, width: f64, height: f64) -> Viewport {
    Viewport { zoom, pan_x: 0.0, pan_y: 0.0, width, height }
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_serde_roundtrip() {
    let p = Point::new(1.5, -2.0);
    let json = serde_json::to_string(&p).unwrap();
    let back: Point = serde_json::from_str(&json).unwrap();
    assert_eq!(p, back);
}

// --- scale / clamp_zoom ---

#[test]
fn scale_is_percentage() {
    assert_eq!(scale(100.0), 1.0);
    assert_eq!(scale(25.0), 0.25);
    assert_eq!(scale(400.0), 4.0);
}

#[test]
fn clamp_zoom_stays_in_range() {
    for z in [-1000.0, 0.0, 10.0, 25.0, 26.0, 100.0, 399.0, 400.0, 401.0, 10_000.0] {
        let c = clamp_zoom(z);
        assert!((MIN_ZOOM..=MAX_ZOOM).contains(&c), "zoom {z} clamped to {c}");
    }
}

#[test]
fn clamp_zoom_passes_valid_values() {
    assert_eq!(clamp_zoom(150.0), 150.0);
}

// --- max_pan ---

#[test]
fn max_pan_at_max_zoom() {
    let limits = max_pan(400.0, 800.0, 600.0);
    assert!(approx_eq(limits.max_x, 3160.0));
    assert!(approx_eq(limits.max_y, 1940.0));
}

#[test]
fn max_pan_at_default_zoom() {
    let limits = max_pan(100.0, 800.0, 600.0);
    assert!(approx_eq(limits.max_x, 440.0));
    assert!(approx_eq(limits.max_y, 260.0));
}

#[test]
fn max_pan_floors_at_zero_when_workspace_smaller_than_viewport() {
    // 1680 * 0.25 = 420 < 800
    let limits = max_pan(25.0, 800.0, 600.0);
    assert_eq!(limits.max_x, 0.0);
    assert_eq!(limits.max_y, 0.0);
}

#[test]
fn max_pan_grows_with_zoom() {
    let low = max_pan(100.0, 800.0, 600.0);
    let high = max_pan(200.0, 800.0, 600.0);
    assert!(high.max_x > low.max_x);
    assert!(high.max_y > low.max_y);
}

// --- constrain_pan ---

#[test]
fn constrain_pan_clamps_to_limits_at_max_zoom() {
    let vp = viewport(400.0, 800.0, 600.0);
    let p = vp.constrain_pan(5000.0, 5000.0);
    assert!(point_approx_eq(p, Point::new(3160.0, 1940.0)));
}

#[test]
fn constrain_pan_clamps_negative_side() {
    let vp = viewport(400.0, 800.0, 600.0);
    let p = vp.constrain_pan(-5000.0, -5000.0);
    assert!(point_approx_eq(p, Point::new(-3160.0, -1940.0)));
}

#[test]
fn constrain_pan_axes_are_independent() {
    let vp = viewport(100.0, 800.0, 600.0);
    let p = vp.constrain_pan(100.0, 9999.0);
    assert_eq!(p.x, 100.0);
    assert!(approx_eq(p.y, 260.0));
}

#[test]
fn constrain_pan_inside_limits_is_identity() {
    let vp = viewport(100.0, 800.0, 600.0);
    assert_eq!(vp.constrain_pan(12.0, -34.0), Point::new(12.0, -34.0));
}

#[test]
fn constrain_pan_always_within_limits_and_idempotent() {
    let sizes = [(800.0, 600.0), (1920.0, 1080.0), (320.0, 240.0), (3000.0, 2000.0)];
    let zooms = [25.0, 50.0, 75.0, 100.0, 133.0, 250.0, 400.0];
    let requests = [-1e6, -5000.0, -100.0, 0.0, 42.5, 900.0, 1e6];
    for (w, h) in sizes {
        for zoom in zooms {
            let vp = viewport(zoom, w, h);
            let limits = vp.limits();
            for x in requests {
                for y in requests {
                    let once = vp.constrain_pan(x, y);
                    assert!(once.x.abs() <= limits.max_x);
                    assert!(once.y.abs() <= limits.max_y);
                    let twice = vp.constrain_pan(once.x, once.y);
                    assert_eq!(once, twice);
                }
            }
        }
    }
}

// --- check_boundary ---

#[test]
fn check_boundary_none_in_middle() {
    let vp = viewport(400.0, 800.0, 600.0);
    assert_eq!(vp.check_boundary(0.0, 0.0), None);
}

#[test]
fn check_boundary_left_near_negative_x_limit() {
    let vp = viewport(400.0, 800.0, 600.0);
    assert_eq!(vp.check_boundary(-3150.0, 0.0), Some(Edge::Left));
}

#[test]
fn check_boundary_right_near_positive_x_limit() {
    let vp = viewport(400.0, 800.0, 600.0);
    assert_eq!(vp.check_boundary(3120.0, 0.0), Some(Edge::Right));
}

#[test]
fn check_boundary_top_and_bottom() {
    let vp = viewport(400.0, 800.0, 600.0);
    assert_eq!(vp.check_boundary(0.0, -1900.0), Some(Edge::Top));
    assert_eq!(vp.check_boundary(0.0, 1939.0), Some(Edge::Bottom));
}

#[test]
fn check_boundary_corner_reports_horizontal_edge_first() {
    let vp = viewport(400.0, 800.0, 600.0);
    assert_eq!(vp.check_boundary(-3160.0, -1940.0), Some(Edge::Left));
    assert_eq!(vp.check_boundary(3160.0, 1940.0), Some(Edge::Right));
}

#[test]
fn check_boundary_margin_is_exclusive() {
    let vp = viewport(400.0, 800.0, 600.0);
    assert_eq!(vp.check_boundary(3110.0, 0.0), None);
}

#[test]
fn check_boundary_ignores_locked_axes() {
    // 25% of 1680×1120 fits inside 1280×800, so both limits floor at 0.
    let vp = viewport(25.0, 1280.0, 800.0);
    assert_eq!(vp.limits(), PanLimits { max_x: 0.0, max_y: 0.0 });
    assert_eq!(vp.check_boundary(0.0, 0.0), None);
    assert_eq!(vp.boundary(), None);
}

#[test]
fn check_boundary_still_reports_the_free_axis() {
    let vp = viewport(100.0, 1680.0, 600.0);
    assert_eq!(vp.check_boundary(0.0, 0.0), None);
    assert_eq!(vp.check_boundary(0.0, 250.0), Some(Edge::Bottom));
    assert_eq!(vp.check_boundary(0.0, -230.0), Some(Edge::Top));
}

#[test]
fn boundary_uses_committed_pan() {
    let mut vp = viewport(400.0, 800.0, 600.0);
    vp.set_pan(0.0, 5000.0);
    assert_eq!(vp.boundary(), Some(Edge::Bottom));
}

// --- set_pan ---

#[test]
fn set_pan_stores_constrained_value() {
    let mut vp = viewport(400.0, 800.0, 600.0);
    let p = vp.set_pan(5000.0, 5000.0);
    assert!(point_approx_eq(p, Point::new(3160.0, 1940.0)));
    assert!(point_approx_eq(vp.pan(), p));
}

// --- set_zoom ---

#[test]
fn set_zoom_at_min_is_noop() {
    let mut vp = viewport(MIN_ZOOM, 800.0, 600.0);
    vp.pan_x = 0.0;
    vp.pan_y = 0.0;
    assert!(!vp.set_zoom(25.0));
    assert_eq!(vp.zoom, 25.0);
    assert_eq!(vp.pan(), Point::new(0.0, 0.0));
}

#[test]
fn set_zoom_below_min_at_min_is_noop() {
    let mut vp = viewport(MIN_ZOOM, 800.0, 600.0);
    assert!(!vp.set_zoom(MIN_ZOOM - ZOOM_STEP));
    assert_eq!(vp.zoom, MIN_ZOOM);
}

#[test]
fn set_zoom_clamps_to_max() {
    let mut vp = viewport(100.0, 800.0, 600.0);
    assert!(vp.set_zoom(9000.0));
    assert_eq!(vp.zoom, MAX_ZOOM);
}

#[test]
fn set_zoom_rejects_non_finite() {
    let mut vp = viewport(100.0, 800.0, 600.0);
    assert!(!vp.set_zoom(f64::NAN));
    assert!(!vp.set_zoom(f64::INFINITY));
    assert_eq!(vp.zoom, 100.0);
}

#[test]
fn set_zoom_rescales_pan_by_ratio() {
    let mut vp = viewport(100.0, 800.0, 600.0);
    vp.set_pan(100.0, -50.0);
    assert!(vp.set_zoom(200.0));
    assert!(point_approx_eq(vp.pan(), Point::new(200.0, -100.0)));
}

#[test]
fn set_zoom_reclamps_after_rescale() {
    let mut vp = viewport(400.0, 800.0, 600.0);
    vp.set_pan(3160.0, 1940.0);
    assert!(vp.set_zoom(100.0));
    // 3160 / 4 = 790 > 440, 1940 / 4 = 485 > 260
    assert!(point_approx_eq(vp.pan(), Point::new(440.0, 260.0)));
}

#[test]
fn set_zoom_never_leaves_pan_outside_new_limits() {
    let zooms = [25.0, 40.0, 90.0, 100.0, 180.0, 300.0, 400.0];
    for z1 in zooms {
        for z2 in zooms {
            let mut vp = viewport(z1, 1024.0, 768.0);
            let limits = vp.limits();
            vp.set_pan(limits.max_x, -limits.max_y);
            vp.set_zoom(z2);
            let after = vp.limits();
            assert!(vp.pan_x.abs() <= after.max_x, "{z1} -> {z2}");
            assert!(vp.pan_y.abs() <= after.max_y, "{z1} -> {z2}");
        }
    }
}

#[test]
fn set_zoom_keeps_center_point_when_unclamped() {
    let mut vp = viewport(100.0, 800.0, 600.0);
    vp.set_pan(120.0, 80.0);
    let center = Point::new(400.0, 300.0);
    let before = vp.screen_to_workspace(center);
    vp.set_zoom(150.0);
    let after = vp.screen_to_workspace(center);
    assert!(point_approx_eq(before, after));
}

// --- set_size ---

#[test]
fn set_size_reclamps_pan() {
    let mut vp = viewport(100.0, 800.0, 600.0);
    vp.set_pan(440.0, 260.0);
    vp.set_size(1600.0, 1000.0);
    // (1680 - 1600) / 2 = 40, (1120 - 1000) / 2 = 60
    assert!(point_approx_eq(vp.pan(), Point::new(40.0, 60.0)));
}

// --- coordinate conversion ---

#[test]
fn workspace_center_maps_to_viewport_center() {
    let vp = viewport(100.0, 800.0, 600.0);
    let screen = vp.workspace_to_screen(Point::new(WORKSPACE_WIDTH / 2.0, WORKSPACE_HEIGHT / 2.0));
    assert!(point_approx_eq(screen, Point::new(400.0, 300.0)));
}

#[test]
fn screen_to_workspace_with_zoom_and_pan() {
    let mut vp = viewport(200.0, 800.0, 600.0);
    vp.set_pan(100.0, 0.0);
    let ws = vp.screen_to_workspace(Point::new(500.0, 300.0));
    assert!(point_approx_eq(ws, Point::new(WORKSPACE_WIDTH / 2.0, WORKSPACE_HEIGHT / 2.0)));
}

#[test]
fn conversions_roundtrip() {
    let mut vp = viewport(250.0, 1024.0, 768.0);
    vp.set_pan(-300.0, 120.0);
    let ws = Point::new(WORKSPACE_PADDING + 37.0, WORKSPACE_PADDING + 410.0);
    let back = vp.screen_to_workspace(vp.workspace_to_screen(ws));
    assert!(point_approx_eq(ws, back));
}

#[test]
fn screen_dist_to_workspace_divides_by_scale() {
    let vp = viewport(400.0, 800.0, 600.0);
    assert!(approx_eq(vp.screen_dist_to_workspace(100.0), 25.0));
}

// --- Viewport defaults ---

#[test]
fn viewport_default_is_identity() {
    let vp = Viewport::default();
    assert_eq!(vp.zoom, 100.0);
    assert_eq!(vp.pan(), Point::new(0.0, 0.0));
}

#[test]
fn viewport_new_sets_size() {
    let vp = Viewport::new(640.0, 480.0);
    assert_eq!(vp.width, 640.0);
    assert_eq!(vp.height, 480.0);
    assert_eq!(vp.zoom, 100.0);
}
