use approx::assert_relative_eq;

use chronomap_core::consts::ZOOM_DIVISOR;
use chronomap_core::view::ViewportState;

fn view(width: u32, height: u32) -> ViewportState {
    let mut v = ViewportState::new(1.0, 0.1, 10.0);
    v.resize(width, height);
    v
}

/// Wheel delta that undoes a zoom by `factor`.
fn inverse_dy(factor: f64) -> f64 {
    ZOOM_DIVISOR * (1.0 / factor - 1.0)
}

// ---------------------------------------------------------------------------
// Coordinate transforms
// ---------------------------------------------------------------------------

#[test]
fn test_screen_center_maps_to_negated_pan() {
    let mut v = view(800, 600);
    v.set_pan(30.0, -20.0);
    let t = v.screen_to_terrain(400.0, 300.0);
    assert_relative_eq!(t.x, -30.0);
    assert_relative_eq!(t.y, 20.0);
}

#[test]
fn test_screen_terrain_round_trip() {
    let mut v = view(640, 480);
    v.set_pan(12.5, -7.25);
    v.set_scale(3.0);
    for &(sx, sy) in &[(0.0, 0.0), (320.0, 240.0), (639.0, 1.0), (-50.0, 900.0)] {
        let t = v.screen_to_terrain(sx, sy);
        let s = v.terrain_to_screen(t.x, t.y);
        assert_relative_eq!(s.x, sx, epsilon = 1e-9);
        assert_relative_eq!(s.y, sy, epsilon = 1e-9);
    }
}

#[test]
fn test_visible_rect_follows_pan_and_scale() {
    let mut v = view(200, 100);
    v.set_pan(10.0, 5.0);
    v.set_scale(2.0);
    let r = v.visible();
    assert_relative_eq!(r.left, (-100.0 - 10.0) * 2.0);
    assert_relative_eq!(r.right, (100.0 - 10.0) * 2.0);
    assert_relative_eq!(r.top, (-50.0 - 5.0) * 2.0);
    assert_relative_eq!(r.bottom, (50.0 - 5.0) * 2.0);
    assert_relative_eq!(r.width(), 400.0);
    assert_relative_eq!(r.height(), 200.0);
}

#[test]
fn test_extended_padding_constant_in_screen_pixels() {
    let mut v = view(200, 100);
    for &scale in &[0.5, 1.0, 4.0] {
        v.set_scale(scale);
        let inner = v.visible();
        let outer = v.extended(250.0, 100.0);
        assert_relative_eq!((inner.left - outer.left) / scale, 250.0);
        assert_relative_eq!((outer.bottom - inner.bottom) / scale, 100.0);
    }
}

#[test]
fn test_resize_refreshes_visible_rect() {
    let mut v = view(100, 100);
    v.resize(400, 100);
    assert_relative_eq!(v.visible().width(), 400.0);
}

// ---------------------------------------------------------------------------
// Zoom
// ---------------------------------------------------------------------------

#[test]
fn test_zoom_keeps_point_under_pointer() {
    let mut v = view(800, 600);
    v.set_pan(40.0, -25.0);
    let before = v.screen_to_terrain(123.0, 456.0);
    v.zoom_at(10.0, 123.0, 456.0);
    let after = v.screen_to_terrain(123.0, 456.0);
    assert_relative_eq!(before.x, after.x, epsilon = 1e-9);
    assert_relative_eq!(before.y, after.y, epsilon = 1e-9);
    assert_relative_eq!(v.scale(), 1.2);
}

#[test]
fn test_zoom_then_inverse_restores_view() {
    for &dy in &[-20.0, -5.0, 0.5, 3.0, 10.0, 30.0] {
        let mut v = view(1024, 768);
        v.set_pan(-33.0, 71.0);
        let (px, py) = (700.0, 150.0);
        let anchor = v.screen_to_terrain(px, py);
        let pan = v.pan();

        let factor = v.zoom_at(dy, px, py);
        v.zoom_at(inverse_dy(factor), px, py);

        assert_relative_eq!(v.scale(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(v.pan().x, pan.x, epsilon = 1e-6);
        assert_relative_eq!(v.pan().y, pan.y, epsilon = 1e-6);
        let back = v.terrain_to_screen(anchor.x, anchor.y);
        assert_relative_eq!(back.x, px, epsilon = 1e-6);
        assert_relative_eq!(back.y, py, epsilon = 1e-6);
    }
}

#[test]
fn test_zoom_clamps_to_max_and_reports_applied_factor() {
    let mut v = ViewportState::new(8.0, 0.1, 10.0);
    v.resize(100, 100);
    let before = v.screen_to_terrain(10.0, 90.0);
    let factor = v.zoom_at(50.0, 10.0, 90.0);
    assert_relative_eq!(v.scale(), 10.0);
    assert_relative_eq!(factor, 1.25);
    let after = v.screen_to_terrain(10.0, 90.0);
    assert_relative_eq!(before.x, after.x, epsilon = 1e-9);
    assert_relative_eq!(before.y, after.y, epsilon = 1e-9);
}

#[test]
fn test_zoom_clamps_to_min() {
    let mut v = view(100, 100);
    v.zoom_at(-49.0, 50.0, 50.0);
    v.zoom_at(-49.0, 50.0, 50.0);
    assert_relative_eq!(v.scale(), 0.1);
}

#[test]
fn test_scale_always_within_limits() {
    let mut v = view(300, 300);
    for dy in [-500.0, 80.0, 200.0, -10.0, 1000.0, -49.99] {
        v.zoom_at(dy, 10.0, 20.0);
        let (min, max) = v.scale_limits();
        assert!(v.scale() >= min && v.scale() <= max, "scale {} escaped", v.scale());
    }
}

#[test]
fn test_new_clamps_initial_scale() {
    let v = ViewportState::new(50.0, 0.1, 10.0);
    assert_relative_eq!(v.scale(), 10.0);
}
