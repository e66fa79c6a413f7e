//! Touch gamepad overlay: two directional pads, two menu buttons, and the
//! fullscreen/back controls. Presentation only; all input goes through the
//! instance's [`EventSink`].

use crate::constants::*;
use crate::dom::Listener;
use crate::events::{wire_menu_zone, wire_touch_pad, EventSink};
use gameport_core::{InputState, LogicalButton, TouchZone};
use web_sys as web;

const MARKUP: &str = r#"
<div class="gamepadLeft">
  <div class="dpadAnchor">
    <div id="up" class="dpad up"></div>
    <div id="down" class="dpad down"></div>
    <div id="left" class="dpad left"></div>
    <div id="right" class="dpad right"></div>
  </div>
  <div class="touchpad left"></div>
  <div id="menuLeft" class="menuButton left"></div>
</div>
<div class="gamepadRight">
  <div class="buttonAnchor">
    <div id="north" class="button north"></div>
    <div id="south" class="button south"></div>
    <div id="east" class="button east"></div>
    <div id="west" class="button west"></div>
  </div>
  <div class="touchpad right"></div>
  <div id="menuRight" class="menuButton right"></div>
</div>
<div id="fullscreenIcon"></div>
<div id="backButton"></div>
"#;

pub struct Gamepad {
    root: web::Element,
    host: web::Element,
    dpad: web::Element,
    face: web::Element,
    menu_left: web::Element,
    menu_right: web::Element,
    fullscreen: web::Element,
    back: web::Element,
    icons: Vec<(LogicalButton, web::Element)>,
}

fn find(root: &web::Element, selector: &str) -> anyhow::Result<web::Element> {
    root.query_selector(selector)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("gamepad markup lacks {}", selector))
}

fn by_id(root: &web::Element, id: &str) -> anyhow::Result<web::Element> {
    find(root, &format!("#{id}"))
}

impl Gamepad {
    /// Creates the overlay inside `host` (the canvas's parent).
    pub fn build(document: &web::Document, host: &web::Element) -> anyhow::Result<Self> {
        let root = document
            .create_element("div")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        root.set_class_name(GAMEPAD_CLASS);
        root.set_inner_html(MARKUP);
        host.append_child(&root)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let mut icons = Vec::with_capacity(ICON_IDS.len());
        for (id, name) in ICON_IDS {
            let button = LogicalButton::from_name(name)
                .ok_or_else(|| anyhow::anyhow!("unknown button {}", name))?;
            icons.push((button, by_id(&root, id)?));
        }

        Ok(Self {
            dpad: find(&root, DPAD_PAD_SELECTOR)?,
            face: find(&root, FACE_PAD_SELECTOR)?,
            menu_left: by_id(&root, MENU_LEFT_ID)?,
            menu_right: by_id(&root, MENU_RIGHT_ID)?,
            fullscreen: by_id(&root, FULLSCREEN_ICON_ID)?,
            back: by_id(&root, BACK_BUTTON_ID)?,
            host: host.clone(),
            root,
            icons,
        })
    }

    /// Wires every zone to `sink`. Listeners live as long as the returned
    /// guard.
    pub fn attach(self, sink: &EventSink) -> Teardown {
        let mut listeners = Vec::new();
        listeners.extend(wire_touch_pad(&self.dpad, TouchZone::Dpad, sink));
        listeners.extend(wire_touch_pad(&self.face, TouchZone::Face, sink));
        listeners.extend(wire_menu_zone(&self.menu_left, TouchZone::MenuLeft, sink));
        listeners.extend(wire_menu_zone(&self.menu_right, TouchZone::MenuRight, sink));

        let host = self.host.clone();
        listeners.push(Listener::new(self.fullscreen.as_ref(), "click", move |_| {
            enter_fullscreen(&host)
        }));
        let host = self.host.clone();
        listeners.push(Listener::new(self.back.as_ref(), "click", move |_| {
            exit_fullscreen(&host)
        }));

        Teardown {
            gamepad: self,
            _listeners: listeners,
        }
    }

    /// Lights icons for held buttons.
    pub fn sync(&self, input: &InputState) {
        let held = input.buttons();
        for (button, el) in &self.icons {
            set_pressed(el, held.contains(*button));
        }
        set_pressed(&self.menu_left, !input.zone(TouchZone::MenuLeft).is_empty());
        set_pressed(&self.menu_right, !input.zone(TouchZone::MenuRight).is_empty());
    }
}

fn set_pressed(el: &web::Element, on: bool) {
    _ = el.class_list().toggle_with_force(PRESSED_CLASS, on);
}

/// Real fullscreen when the browser allows it, otherwise the `fullscreen`
/// class stretches the host over the page.
fn enter_fullscreen(host: &web::Element) {
    if let Err(e) = host.request_fullscreen() {
        log::debug!("[viewport] fullscreen refused ({:?}), using faux", e);
    }
    _ = host.class_list().add_1(FULLSCREEN_CLASS);
}

fn exit_fullscreen(host: &web::Element) {
    if let Some(doc) = host.owner_document() {
        if doc.fullscreen_element().is_some() {
            doc.exit_fullscreen();
        }
    }
    _ = host.class_list().remove_1(FULLSCREEN_CLASS);
}

/// Keeps the gamepad wired. Dropping it removes every listener and the
/// overlay markup.
pub struct Teardown {
    gamepad: Gamepad,
    _listeners: Vec<Listener>,
}

impl Teardown {
    pub fn gamepad(&self) -> &Gamepad {
        &self.gamepad
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.gamepad.root.remove();
        _ = self.gamepad.host.class_list().remove_1(FULLSCREEN_CLASS);
    }
}
