use crate::audio::AudioOut;
use crate::bridge::WebGuest;
use crate::dom;
use crate::gamepad::Teardown;
use gameport_core::host::now_ms;
use gameport_core::{Frame, Session};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{Clamped, JsCast};
use web_sys as web;

pub struct FrameContext {
    pub session: Rc<RefCell<Session>>,
    pub guest: WebGuest,
    pub canvas: web::HtmlCanvasElement,
    pub ctx: web::CanvasRenderingContext2d,
    /// Logical-size staging canvas the guest's pixels are put into.
    pub staging: web::HtmlCanvasElement,
    pub staging_ctx: web::CanvasRenderingContext2d,
    pub audio: Rc<AudioOut>,
    pub gamepad: Option<Teardown>,
}

impl FrameContext {
    pub fn new(
        session: Rc<RefCell<Session>>,
        guest: WebGuest,
        canvas: web::HtmlCanvasElement,
        audio: Rc<AudioOut>,
        gamepad: Option<Teardown>,
    ) -> anyhow::Result<Self> {
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let staging: web::HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?
            .dyn_into()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        let logical = session.borrow().logical_size();
        staging.set_width(logical.x as u32);
        staging.set_height(logical.y as u32);
        Ok(Self {
            ctx: dom::context_2d(&canvas)?,
            staging_ctx: dom::context_2d(&staging)?,
            staging,
            session,
            guest,
            canvas,
            audio,
            gamepad,
        })
    }

    /// One tick. Returns false once the instance has faulted.
    pub fn frame(&mut self) -> bool {
        let mut session = self.session.borrow_mut();
        if session.take_viewport_change().is_some() {
            // stale pixels would otherwise linger in the letterbox bars
            let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
            self.ctx.clear_rect(0.0, 0.0, w, h);
        }
        let fault = match session.frame(now_ms(), &mut self.guest) {
            Ok(Some(frame)) => {
                blit(&self.ctx, &self.staging, &self.staging_ctx, &frame);
                None
            }
            Ok(None) => None,
            Err(e) => Some(e),
        };
        if let Some(e) = fault {
            log::error!("[bridge] stopping render loop: {}", e);
            self.audio.pool.mute_all();
            // removes the gamepad listeners and overlay
            self.gamepad = None;
            return false;
        }
        if let Some(pad) = &self.gamepad {
            pad.gamepad().sync(session.input());
        }
        true
    }
}

fn blit(
    ctx: &web::CanvasRenderingContext2d,
    staging: &web::HtmlCanvasElement,
    staging_ctx: &web::CanvasRenderingContext2d,
    frame: &Frame<'_>,
) {
    if staging.width() != frame.width || staging.height() != frame.height {
        staging.set_width(frame.width);
        staging.set_height(frame.height);
    }
    let image = match web::ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(frame.pixels),
        frame.width,
        frame.height,
    ) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("[pixels] ImageData rejected frame: {:?}", e);
            return;
        }
    };
    _ = staging_ctx.put_image_data(&image, 0.0, 0.0);

    // resizing the canvas resets context state, so set this every blit
    ctx.set_image_smoothing_enabled(false);
    let g = frame.geometry;
    _ = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
        staging,
        g.offset.x as f64,
        g.offset.y as f64,
        g.size.x as f64,
        g.size.y as f64,
    );
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !frame_ctx.borrow_mut().frame() {
            return;
        }
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
