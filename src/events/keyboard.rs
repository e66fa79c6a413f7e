use super::EventSink;
use crate::dom::Listener;
use gameport_core::{HostEvent, KeyMapping};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Physical keys on the window, by `KeyboardEvent.code`. Mapped keys have
/// their default action suppressed so arrows and Space do not scroll the page.
pub fn wire_keyboard(window: &web::Window, keymap: &KeyMapping, sink: &EventSink) {
    let target: &web::EventTarget = window.as_ref();

    let keys = keymap.clone();
    let down = sink.clone();
    Listener::new(target, "keydown", move |ev: web::Event| {
        let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() else {
            return;
        };
        let code = ev.code();
        if keys.lookup(&code).is_some() {
            ev.prevent_default();
            down.send(HostEvent::KeyDown(code));
        }
    })
    .forget();

    let keys = keymap.clone();
    let up = sink.clone();
    Listener::new(target, "keyup", move |ev: web::Event| {
        let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() else {
            return;
        };
        let code = ev.code();
        if keys.lookup(&code).is_some() {
            ev.prevent_default();
            up.send(HostEvent::KeyUp(code));
        }
    })
    .forget();

    // keyups are lost while the page is unfocused
    let blur = sink.clone();
    Listener::new(target, "blur", move |_| blur.send(HostEvent::Blur)).forget();
}
