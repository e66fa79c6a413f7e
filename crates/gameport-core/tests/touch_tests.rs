// Touch geometry and axis discretization on whole surfaces.

use gameport_core::*;
use glam::Vec2;

fn pad() -> ControlSurface {
    ControlSurface::new(10.0, 20.0, 100.0, 80.0)
}

#[test]
fn vector_is_zero_at_center() {
    let s = pad();
    assert_eq!(touch_vector(&s, s.center()), Vec2::ZERO);
}

#[test]
fn vector_is_unit_at_edges() {
    let s = pad();
    assert_eq!(touch_vector(&s, Vec2::new(10.0, 60.0)), Vec2::new(-1.0, 0.0));
    assert_eq!(touch_vector(&s, Vec2::new(110.0, 60.0)), Vec2::new(1.0, 0.0));
    assert_eq!(touch_vector(&s, Vec2::new(60.0, 20.0)), Vec2::new(0.0, -1.0));
    assert_eq!(touch_vector(&s, Vec2::new(60.0, 100.0)), Vec2::new(0.0, 1.0));
}

#[test]
fn points_inside_stay_within_unit_range() {
    let s = pad();
    for ix in 0..=20 {
        for iy in 0..=16 {
            let p = Vec2::new(10.0 + ix as f32 * 5.0, 20.0 + iy as f32 * 5.0);
            assert!(s.contains(p));
            let v = touch_vector(&s, p);
            assert!(v.x.abs() <= 1.0 && v.y.abs() <= 1.0, "{:?} -> {:?}", p, v);
        }
    }
}

#[test]
fn points_outside_are_not_clamped() {
    let s = pad();
    let v = touch_vector(&s, Vec2::new(210.0, 60.0));
    assert!((v.x - 3.0).abs() < 1e-6);
}

#[test]
fn zero_sized_surface_yields_zero_vector() {
    let s = ControlSurface::new(0.0, 0.0, 0.0, 0.0);
    assert_eq!(touch_vector(&s, Vec2::new(5.0, -5.0)), Vec2::ZERO);
}

#[test]
fn swipe_across_pad_hands_off_left_to_right() {
    let s = pad();
    let disc = AxisDiscretizer::new(DirectionalButtons::DPAD, DEFAULT_DEAD_ZONE);
    let mut state = ButtonSet::EMPTY;

    state = disc.discretize(touch_vector(&s, Vec2::new(15.0, 60.0))).apply(state);
    assert!(state.contains(LogicalButton::Left));

    state = disc.discretize(touch_vector(&s, s.center())).apply(state);
    assert!(state.is_empty());

    state = disc.discretize(touch_vector(&s, Vec2::new(105.0, 60.0))).apply(state);
    assert_eq!(state, ButtonSet::from(LogicalButton::Right));
}

#[test]
fn release_clears_every_surface_button() {
    let disc = AxisDiscretizer::new(DirectionalButtons::FACE, DEFAULT_DEAD_ZONE);
    let held = ButtonSet::from_iter([LogicalButton::North, LogicalButton::East, LogicalButton::L]);
    let after = disc.release().apply(held);
    assert_eq!(after, ButtonSet::from(LogicalButton::L));
}

#[test]
fn circular_dead_zone_reaches_diagonals_on_the_rim() {
    let disc = AxisDiscretizer::new(DirectionalButtons::DPAD, DEFAULT_DEAD_ZONE)
        .with_shape(DeadZoneShape::Circular);
    let d = disc.discretize(Vec2::new(0.5, 0.5));
    assert!(d.set.contains(LogicalButton::Right));
    assert!(d.set.contains(LogicalButton::Down));

    // inside the radius everything releases, even past the square threshold on one axis
    let d = disc.discretize(Vec2::new(0.29, 0.0));
    assert!(d.set.is_empty());
    assert_eq!(d.clear, DirectionalButtons::DPAD.all());
}
