use crate::constants::DATA_PREFIX;
use gameport_core::window_device_size;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Value of `data-<key>` on `el`.
#[inline]
pub fn data_attr(el: &web::Element, key: &str) -> Option<String> {
    el.get_attribute(&format!("{DATA_PREFIX}{key}"))
}

/// Size the canvas to the window: CSS box at `innerWidth × innerHeight`, backing
/// store at that times `devicePixelRatio`. Returns the device-pixel size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (f32, f32) {
    let Some(w) = web::window() else {
        return (canvas.width() as f32, canvas.height() as f32);
    };
    let css_w = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let css_h = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let (w_px, h_px) = window_device_size(css_w, css_h, w.device_pixel_ratio());

    // pinning the CSS box keeps the backing store from feeding back into layout
    let style = canvas.style();
    _ = style.set_property("width", &format!("{}px", css_w));
    _ = style.set_property("height", &format!("{}px", css_h));
    if canvas.width() != w_px {
        canvas.set_width(w_px);
    }
    if canvas.height() != h_px {
        canvas.set_height(h_px);
    }
    (w_px as f32, h_px as f32)
}

pub fn context_2d(canvas: &web::HtmlCanvasElement) -> anyhow::Result<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("getContext failed: {:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("no 2d context"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))
}

/// An event listener that is removed again when dropped.
pub struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Option<Closure<dyn FnMut(web::Event)>>,
}

impl Listener {
    pub fn new(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            kind,
            closure: Some(closure),
        }
    }

    /// Keep the listener for the lifetime of the page.
    pub fn forget(mut self) {
        if let Some(closure) = self.closure.take() {
            closure.forget();
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(closure) = self.closure.take() {
            _ = self
                .target
                .remove_event_listener_with_callback(self.kind, closure.as_ref().unchecked_ref());
        }
    }
}
