use super::EventSink;
use crate::dom::Listener;
use gameport_core::{touch_vector, ControlSurface, HostEvent, TouchPhase, TouchZone};
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

const PAD_EVENTS: [(&str, TouchPhase); 4] = [
    ("touchstart", TouchPhase::Start),
    ("touchmove", TouchPhase::Move),
    ("touchend", TouchPhase::End),
    ("touchcancel", TouchPhase::Cancel),
];

/// Live layout of `el`. Read on every event, never cached: rotation and
/// fullscreen move the pads.
fn surface_of(el: &web::Element) -> ControlSurface {
    let r = el.get_bounding_client_rect();
    ControlSurface::new(
        r.left() as f32,
        r.top() as f32,
        r.width() as f32,
        r.height() as f32,
    )
}

fn first_touch(list: &web::TouchList) -> Option<Vec2> {
    list.get(0)
        .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
}

/// Directional touch pad feeding `zone`'s discretizer.
pub fn wire_touch_pad(el: &web::Element, zone: TouchZone, sink: &EventSink) -> Vec<Listener> {
    PAD_EVENTS
        .iter()
        .map(|&(kind, phase)| {
            let pad = el.clone();
            let sink = sink.clone();
            Listener::new(el.as_ref(), kind, move |ev: web::Event| {
                let Some(ev) = ev.dyn_ref::<web::TouchEvent>() else {
                    return;
                };
                ev.prevent_default();
                // lifting any finger releases the whole pad
                let vector = first_touch(&ev.target_touches())
                    .filter(|_| phase.is_contact())
                    .map(|p| touch_vector(&surface_of(&pad), p))
                    .unwrap_or(Vec2::ZERO);
                sink.send(HostEvent::Touch {
                    zone,
                    phase,
                    vector,
                });
            })
        })
        .collect()
}

/// Plain press zone (menu buttons).
pub fn wire_menu_zone(el: &web::Element, zone: TouchZone, sink: &EventSink) -> Vec<Listener> {
    [
        ("touchstart", true),
        ("touchend", false),
        ("touchcancel", false),
        ("mousedown", true),
        ("mouseup", false),
        ("mouseleave", false),
    ]
    .into_iter()
    .map(|(kind, pressed)| {
        let sink = sink.clone();
        Listener::new(el.as_ref(), kind, move |ev: web::Event| {
            if kind.starts_with("touch") {
                ev.prevent_default();
            }
            sink.send(HostEvent::Press { zone, pressed });
        })
    })
    .collect()
}
