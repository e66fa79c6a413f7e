//! Aggregates touch zones and physical keys into one published button word.
//!
//! Every source keeps its own assertions and the published value is their
//! union, so letting go of the touch D-pad while `W` is still held keeps `UP`
//! pressed. The word is mirrored into an atomic that guest imports read
//! without borrowing the aggregator.

use crate::button::{ButtonSet, LogicalButton};
use crate::discretize::TouchDelta;
use crate::keymap::KeyMapping;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

/// Touch regions of the gamepad overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchZone {
    /// Left pad, D-pad directions.
    Dpad,
    /// Right pad, face buttons.
    Face,
    MenuLeft,
    MenuRight,
}

impl TouchZone {
    pub const COUNT: usize = 4;
    pub const ALL: [TouchZone; TouchZone::COUNT] = [
        TouchZone::Dpad,
        TouchZone::Face,
        TouchZone::MenuLeft,
        TouchZone::MenuRight,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Read side of the published button word.
#[derive(Clone, Debug, Default)]
pub struct SharedButtons(Arc<AtomicU16>);

impl SharedButtons {
    #[inline]
    pub fn get(&self) -> u16 {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    fn publish(&self, bits: u16) {
        self.0.store(bits, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct InputState {
    keymap: KeyMapping,
    held_keys: SmallVec<[(String, LogicalButton); 8]>,
    zones: [ButtonSet; TouchZone::COUNT],
    current: ButtonSet,
    shared: SharedButtons,
}

impl InputState {
    pub fn new(keymap: KeyMapping) -> Self {
        Self {
            keymap,
            held_keys: SmallVec::new(),
            zones: [ButtonSet::EMPTY; TouchZone::COUNT],
            current: ButtonSet::EMPTY,
            shared: SharedButtons::default(),
        }
    }

    pub fn keymap(&self) -> &KeyMapping {
        &self.keymap
    }

    /// Handle that observes every change to [`InputState::current_state`].
    pub fn shared(&self) -> SharedButtons {
        self.shared.clone()
    }

    pub fn apply_touch_delta(&mut self, zone: TouchZone, delta: TouchDelta) {
        let slot = &mut self.zones[zone.index()];
        *slot = delta.apply(*slot);
        self.recompute();
    }

    /// Returns whether `code` is mapped. Unknown codes change nothing.
    pub fn apply_key_down(&mut self, code: &str) -> bool {
        let Some(button) = self.keymap.lookup(code) else {
            return false;
        };
        // auto-repeat delivers keydown again while held
        if !self.held_keys.iter().any(|(k, _)| k == code) {
            self.held_keys.push((code.to_string(), button));
            self.recompute();
        }
        true
    }

    pub fn apply_key_up(&mut self, code: &str) -> bool {
        if self.keymap.lookup(code).is_none() {
            return false;
        }
        let before = self.held_keys.len();
        self.held_keys.retain(|(k, _)| k != code);
        if self.held_keys.len() != before {
            self.recompute();
        }
        true
    }

    /// Drops every source's assertions, e.g. when the page loses focus and
    /// pending keyups will never arrive.
    pub fn release_all(&mut self) {
        self.held_keys.clear();
        self.zones = [ButtonSet::EMPTY; TouchZone::COUNT];
        self.recompute();
    }

    #[inline]
    pub fn current_state(&self) -> u16 {
        self.current.bits()
    }

    #[inline]
    pub fn buttons(&self) -> ButtonSet {
        self.current
    }

    pub fn zone(&self, zone: TouchZone) -> ButtonSet {
        self.zones[zone.index()]
    }

    pub fn keyboard(&self) -> ButtonSet {
        self.held_keys.iter().map(|(_, b)| *b).collect()
    }

    fn recompute(&mut self) {
        let touch = self
            .zones
            .iter()
            .fold(ButtonSet::EMPTY, |acc, z| acc.union(*z));
        self.current = touch.union(self.keyboard());
        self.shared.publish(self.current.bits());
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(KeyMapping::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_keys_on_one_button_release_independently() {
        let keymap = KeyMapping::standard().with("KeyZ", LogicalButton::Select);
        let mut input = InputState::new(keymap);
        input.apply_key_down("Space");
        input.apply_key_down("KeyZ");
        input.apply_key_up("Space");
        assert!(input.buttons().contains(LogicalButton::Select));
        input.apply_key_up("KeyZ");
        assert!(input.buttons().is_empty());
    }

    #[test]
    fn repeated_keydown_is_idempotent() {
        let mut input = InputState::default();
        input.apply_key_down("KeyW");
        input.apply_key_down("KeyW");
        input.apply_key_up("KeyW");
        assert_eq!(input.current_state(), 0);
    }

    #[test]
    fn shared_handle_tracks_updates() {
        let mut input = InputState::default();
        let shared = input.shared();
        input.apply_key_down("KeyD");
        assert_eq!(shared.get(), LogicalButton::Right.bit());
        input.release_all();
        assert_eq!(shared.get(), 0);
    }
}
