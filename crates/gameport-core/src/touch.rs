use glam::Vec2;

/// A touch-sensitive rectangle in client coordinates.
///
/// Rebuilt from live layout for every touch event; the element may have moved
/// or resized (orientation change, reflow) since the previous one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSurface {
    pub origin: Vec2,
    pub size: Vec2,
}

impl ControlSurface {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.x <= max.x && point.y >= self.origin.y && point.y <= max.y
    }

    /// See [`touch_vector`].
    #[inline]
    pub fn touch_vector(&self, point: Vec2) -> Vec2 {
        touch_vector(self, point)
    }
}

/// Offset of `point` from the surface center, in units of half-extent.
///
/// Not clamped: a drag that leaves the surface while still tracked yields
/// components beyond ±1. A collapsed axis reads as centered.
pub fn touch_vector(surface: &ControlSurface, point: Vec2) -> Vec2 {
    let half = surface.size * 0.5;
    let d = point - surface.center();
    let axis = |d: f32, half: f32| if half > 0.0 { d / half } else { 0.0 };
    Vec2::new(axis(d.x, half.x), axis(d.y, half.y))
}
