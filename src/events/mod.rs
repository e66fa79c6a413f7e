mod keyboard;
mod touch;

pub use keyboard::wire_keyboard;
pub use touch::{wire_menu_zone, wire_touch_pad};

use gameport_core::{HostEvent, Session};
use std::cell::RefCell;
use std::rc::Rc;

/// Where DOM handlers deliver input. Handlers never touch guest state; the
/// session queues the event until the next frame.
#[derive(Clone)]
pub struct EventSink {
    session: Rc<RefCell<Session>>,
}

impl EventSink {
    pub fn new(session: &Rc<RefCell<Session>>) -> Self {
        Self {
            session: session.clone(),
        }
    }

    pub fn send(&self, event: HostEvent) {
        match self.session.try_borrow_mut() {
            Ok(mut s) => s.push(event),
            Err(_) => log::debug!("[input] instance busy, dropped {:?}", event),
        }
    }
}
