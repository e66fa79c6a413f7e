//! Fits a fixed logical pixel buffer into a window of any size.
//!
//! The scale never drops below 1: a window smaller than the buffer shows it
//! at native size (cropped by the page) rather than shrinking pixel art.

use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportGeometry {
    pub scale: f32,
    pub size: Vec2,
    pub offset: Vec2,
}

impl ViewportGeometry {
    pub fn fit(window: Vec2, logical: Vec2, pixel_perfect: bool) -> Self {
        let scale = compute_scale(window, logical, pixel_perfect);
        let size = logical * scale;
        Self {
            scale,
            size,
            offset: compute_offset(window, size),
        }
    }
}

pub fn compute_scale(window: Vec2, logical: Vec2, pixel_perfect: bool) -> f32 {
    if logical.x <= 0.0 || logical.y <= 0.0 {
        return 1.0;
    }
    let mut scale = (window.x / logical.x).min(window.y / logical.y);
    if pixel_perfect {
        scale = scale.floor();
    }
    // NaN from a degenerate window falls through to 1 as well
    scale.max(1.0)
}

pub fn compute_size(window: Vec2, logical: Vec2, pixel_perfect: bool) -> Vec2 {
    logical * compute_scale(window, logical, pixel_perfect)
}

/// Centers `scaled` in `window`, never producing a negative offset.
pub fn compute_offset(window: Vec2, scaled: Vec2) -> Vec2 {
    (window - scaled).max(Vec2::ZERO) / 2.0
}

/// Window size in device pixels from `innerWidth`/`innerHeight` (CSS pixels)
/// and `devicePixelRatio`. Each edge is at least 1.
pub fn window_device_size(inner_width: f64, inner_height: f64, dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let edge = |css: f64| {
        if css.is_finite() && css > 0.0 {
            ((css * dpr) as u32).max(1)
        } else {
            1
        }
    };
    (edge(inner_width), edge(inner_height))
}
