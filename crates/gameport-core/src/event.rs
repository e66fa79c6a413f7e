use crate::input::TouchZone;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

impl TouchPhase {
    #[inline]
    pub fn is_contact(self) -> bool {
        matches!(self, TouchPhase::Start | TouchPhase::Move)
    }
}

/// Everything a DOM handler can report to an instance. Handlers only enqueue;
/// the frame callback applies the queue before the guest redraws.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    KeyDown(String),
    KeyUp(String),
    /// Contact on a directional pad. `vector` is ignored for `End`/`Cancel`.
    Touch {
        zone: TouchZone,
        phase: TouchPhase,
        vector: Vec2,
    },
    /// Press zone without axis logic (menu buttons).
    Press { zone: TouchZone, pressed: bool },
    /// Window size in device pixels.
    Resize { width: f32, height: f32 },
    /// Page lost focus; keyups may never arrive.
    Blur,
}
