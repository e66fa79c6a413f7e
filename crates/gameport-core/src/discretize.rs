//! Continuous touch vector to directional button deltas.

use crate::button::{ButtonSet, LogicalButton};
use glam::Vec2;

/// Axis threshold below which a touch counts as centered.
pub const DEFAULT_DEAD_ZONE: f32 = 0.3;

// sin(22.5°): half-width of a 45° sector, applied to the unit direction
const SECTOR_THRESHOLD: f32 = 0.382_683_43;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisState {
    Negative,
    Centered,
    Positive,
}

#[inline]
pub fn classify(value: f32, threshold: f32) -> AxisState {
    if value < -threshold {
        AxisState::Negative
    } else if value > threshold {
        AxisState::Positive
    } else {
        AxisState::Centered
    }
}

/// Shape of the centered region.
///
/// `Square` evaluates each axis on its own against the dead zone, so a long
/// mostly-horizontal drag can still assert a vertical button. `Circular`
/// releases everything while the vector length is within the dead zone and
/// otherwise picks one of eight 45 degree sectors from the direction alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeadZoneShape {
    #[default]
    Square,
    Circular,
}

impl DeadZoneShape {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "square" | "axial" => Some(Self::Square),
            "circular" | "radial" => Some(Self::Circular),
            _ => None,
        }
    }
}

/// The four buttons one surface drives. `y` grows downwards, like client
/// coordinates, so negative y is `up`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionalButtons {
    pub up: LogicalButton,
    pub down: LogicalButton,
    pub left: LogicalButton,
    pub right: LogicalButton,
}

impl DirectionalButtons {
    pub const DPAD: DirectionalButtons = DirectionalButtons {
        up: LogicalButton::Up,
        down: LogicalButton::Down,
        left: LogicalButton::Left,
        right: LogicalButton::Right,
    };

    pub const FACE: DirectionalButtons = DirectionalButtons {
        up: LogicalButton::North,
        down: LogicalButton::South,
        left: LogicalButton::West,
        right: LogicalButton::East,
    };

    pub fn all(&self) -> ButtonSet {
        [self.up, self.down, self.left, self.right]
            .into_iter()
            .collect()
    }
}

/// Buttons to assert and to release, applied as `(state & !clear) | set`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchDelta {
    pub set: ButtonSet,
    pub clear: ButtonSet,
}

impl TouchDelta {
    pub fn release(buttons: ButtonSet) -> Self {
        Self {
            set: ButtonSet::EMPTY,
            clear: buttons,
        }
    }

    #[inline]
    pub fn apply(self, state: ButtonSet) -> ButtonSet {
        state.difference(self.clear).union(self.set)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisDiscretizer {
    buttons: DirectionalButtons,
    dead_zone: f32,
    shape: DeadZoneShape,
}

impl AxisDiscretizer {
    pub fn new(buttons: DirectionalButtons, dead_zone: f32) -> Self {
        Self {
            buttons,
            dead_zone,
            shape: DeadZoneShape::Square,
        }
    }

    pub fn with_shape(mut self, shape: DeadZoneShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn buttons(&self) -> DirectionalButtons {
        self.buttons
    }

    pub fn dead_zone(&self) -> f32 {
        self.dead_zone
    }

    /// Delta for a pointer-down or pointer-move at vector `v`.
    pub fn discretize(&self, v: Vec2) -> TouchDelta {
        let (v, threshold) = match self.shape {
            DeadZoneShape::Square => (v, self.dead_zone),
            DeadZoneShape::Circular => {
                let len = v.length();
                if len <= self.dead_zone || !len.is_finite() {
                    return self.release();
                }
                (v / len, SECTOR_THRESHOLD)
            }
        };
        let b = &self.buttons;
        let mut delta = TouchDelta::default();
        axis_delta(classify(v.x, threshold), b.left, b.right, &mut delta);
        axis_delta(classify(v.y, threshold), b.up, b.down, &mut delta);
        delta
    }

    /// Delta for loss of contact: every button this surface controls is
    /// released regardless of the last vector seen, so a dropped move event
    /// cannot leave a button stuck.
    pub fn release(&self) -> TouchDelta {
        TouchDelta::release(self.buttons.all())
    }
}

fn axis_delta(
    state: AxisState,
    negative: LogicalButton,
    positive: LogicalButton,
    delta: &mut TouchDelta,
) {
    match state {
        AxisState::Negative => {
            delta.set.insert(negative);
            delta.clear.insert(positive);
        }
        AxisState::Positive => {
            delta.set.insert(positive);
            delta.clear.insert(negative);
        }
        AxisState::Centered => {
            delta.clear.insert(negative);
            delta.clear.insert(positive);
        }
    }
}
