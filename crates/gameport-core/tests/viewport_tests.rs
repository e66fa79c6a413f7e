// Scaling a logical buffer into arbitrary windows.

use gameport_core::*;
use glam::Vec2;

const DS: Vec2 = Vec2::new(256.0, 192.0);

#[test]
fn pixel_perfect_full_hd() {
    let g = ViewportGeometry::fit(Vec2::new(1920.0, 1080.0), DS, true);
    assert_eq!(g.scale, 5.0);
    assert_eq!(g.size, Vec2::new(1280.0, 960.0));
    assert_eq!(g.offset, Vec2::new(320.0, 60.0));
}

#[test]
fn smooth_scale_fills_the_limiting_axis() {
    let g = ViewportGeometry::fit(Vec2::new(1920.0, 1080.0), DS, false);
    assert_eq!(g.size, Vec2::new(1440.0, 1080.0));
    assert_eq!(g.offset, Vec2::new(240.0, 0.0));
}

#[test]
fn small_window_never_shrinks_below_native() {
    let size = compute_size(Vec2::new(100.0, 100.0), DS, false);
    assert_eq!(size, DS);
    let offset = compute_offset(Vec2::new(100.0, 100.0), size);
    assert_eq!(offset, Vec2::ZERO);
}

#[test]
fn pixel_perfect_scale_is_an_integer() {
    for w in (200..3000).step_by(37) {
        for h in (150..2000).step_by(53) {
            let g = ViewportGeometry::fit(Vec2::new(w as f32, h as f32), DS, true);
            assert_eq!(g.scale.fract(), 0.0);
            assert!(g.scale >= 1.0);
        }
    }
}

#[test]
fn scaled_image_fits_whenever_the_window_is_larger() {
    let window = Vec2::new(1366.0, 768.0);
    for pp in [false, true] {
        let g = ViewportGeometry::fit(window, DS, pp);
        assert!(g.size.x <= window.x + 1e-3 && g.size.y <= window.y + 1e-3);
        assert!(g.offset.x >= 0.0 && g.offset.y >= 0.0);
    }
}

#[test]
fn degenerate_window_falls_back_to_native() {
    let g = ViewportGeometry::fit(Vec2::ZERO, DS, false);
    assert_eq!(g.scale, 1.0);
    assert_eq!(g.offset, Vec2::ZERO);
}

#[test]
fn window_size_comes_from_inner_size_and_dpr() {
    assert_eq!(window_device_size(960.0, 540.0, 2.0), (1920, 1080));
    // measuring again gives the same answer; nothing grows per resize
    assert_eq!(window_device_size(960.0, 540.0, 2.0), (1920, 1080));
    assert_eq!(window_device_size(0.0, f64::NAN, 2.0), (1, 1));
    assert_eq!(window_device_size(800.0, 600.0, 0.0), (800, 600));
}
