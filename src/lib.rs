#![cfg(target_arch = "wasm32")]
use gameport_core::{GameConfig, HostEvent, Session};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod bridge;
mod constants;
mod dom;
mod events;
mod frame;
mod gamepad;

use events::EventSink;

fn wire_canvas_resize(window: &web::Window, canvas: &web::HtmlCanvasElement, sink: &EventSink) {
    let canvas = canvas.clone();
    let sink = sink.clone();
    dom::Listener::new(window.as_ref(), "resize", move |_| {
        let (width, height) = dom::sync_canvas_backing_size(&canvas);
        sink.send(HostEvent::Resize { width, height });
    })
    .forget();
}

fn read_config(canvas: &web::HtmlCanvasElement) -> anyhow::Result<GameConfig> {
    let el: &web::Element = canvas.as_ref();
    Ok(GameConfig::from_lookup(|key| dom::data_attr(el, key))?)
}

fn wants_gamepad(canvas: &web::HtmlCanvasElement) -> bool {
    match dom::data_attr(canvas.as_ref(), constants::GAMEPAD_ATTR) {
        Some(v) => !matches!(v.trim(), "false" | "0" | "no" | "off"),
        None => false,
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("gameport starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let nodes = document
        .query_selector_all(constants::INSTANCE_SELECTOR)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    if nodes.length() == 0 {
        log::warn!("[bridge] no {} on the page", constants::INSTANCE_SELECTOR);
    }

    for i in 0..nodes.length() {
        let Some(node) = nodes.item(i) else { continue };
        let canvas: web::HtmlCanvasElement = match node.dyn_into() {
            Ok(c) => c,
            Err(_) => continue,
        };
        // instances are independent: one failing to load leaves the others running
        spawn_local(async move {
            if let Err(e) = launch(canvas).await {
                log::error!("[bridge] instance {} failed: {:?}", i, e);
            }
        });
    }
    Ok(())
}

async fn launch(canvas: web::HtmlCanvasElement) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let config = read_config(&canvas)?;
    let session = Rc::new(RefCell::new(Session::new(config.clone())));
    let sink = EventSink::new(&session);

    // viewport math works in device pixels, same as the backing store
    let (w, h) = dom::sync_canvas_backing_size(&canvas);
    session.borrow_mut().resize(w, h);
    wire_canvas_resize(&window, &canvas, &sink);
    events::wire_keyboard(&window, &config.key_mapping, &sink);

    let audio = Rc::new(audio::AudioOut::build()?);
    audio.wire_resume(&window);

    session.borrow_mut().begin_load()?;
    let link = session.borrow().link();
    let loaded = match bridge::load(&config.module_url, &config.exports, &link, &audio).await {
        Ok(l) => l,
        Err(e) => return Err(session.borrow_mut().on_load_failed(e).into()),
    };
    session
        .borrow_mut()
        .on_loaded(loaded.has_entry, loaded.pixel_ptr, loaded.size)?;

    let Some(guest) = loaded.guest else {
        return Ok(());
    };
    if !session.borrow_mut().start()? {
        return Ok(());
    }

    // only a running instance gets the overlay
    let gamepad = match canvas.parent_element() {
        Some(host) if wants_gamepad(&canvas) => {
            Some(gamepad::Gamepad::build(&document, &host)?.attach(&sink))
        }
        _ => None,
    };
    let frame_ctx = frame::FrameContext::new(session, guest, canvas, audio, gamepad)?;
    frame::start_loop(Rc::new(RefCell::new(frame_ctx)));
    Ok(())
}
