//! Fetches and instantiates a guest module, binding the `env` imports.

use crate::audio::AudioOut;
use gameport_core::host::{self, names, HostRandom, IMPORT_MODULE, UNARY_MATH};
use gameport_core::{resolve_export, BridgeError, ExportNames, Guest, GuestMemory, HostLink};
use js_sys::{Function, Object, Reflect, Uint8Array, WebAssembly};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn js_err(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// Guest linear memory. The `ArrayBuffer` is looked up on every access since
/// `memory.grow` detaches the previous one.
#[derive(Clone)]
pub struct WebMemory(WebAssembly::Memory);

impl WebMemory {
    fn buffer(&self) -> Option<js_sys::ArrayBuffer> {
        self.0.buffer().dyn_into::<js_sys::ArrayBuffer>().ok()
    }
}

impl GuestMemory for WebMemory {
    fn byte_len(&self) -> usize {
        self.buffer().map_or(0, |b| b.byte_length() as usize)
    }

    fn read_into(&self, offset: usize, out: &mut [u8]) -> Result<(), BridgeError> {
        let len = out.len();
        let oob = || BridgeError::MemoryOutOfBounds { offset, len };
        let buf = self.buffer().ok_or_else(oob)?;
        let end = offset.checked_add(len).ok_or_else(oob)?;
        if end > buf.byte_length() as usize {
            return Err(oob());
        }
        Uint8Array::new_with_byte_offset_and_length(&buf, offset as u32, len as u32)
            .copy_to(out);
        Ok(())
    }
}

pub struct WebGuest {
    redraw: Function,
    memory: WebMemory,
}

impl Guest for WebGuest {
    type Memory = WebMemory;

    fn redraw(&mut self, dt_ms: f64) -> Result<(), BridgeError> {
        self.redraw
            .call1(&JsValue::NULL, &JsValue::from_f64(dt_ms))
            .map(|_| ())
            .map_err(|e| BridgeError::GuestTrap(js_err(e)))
    }

    fn memory(&self) -> &WebMemory {
        &self.memory
    }
}

/// Result of a successful load. `guest` is present only when the module has an
/// entry point and can therefore be run.
pub struct Loaded {
    pub guest: Option<WebGuest>,
    pub has_entry: bool,
    pub pixel_ptr: usize,
    pub size: Option<(u32, u32)>,
}

type MemorySlot = Rc<RefCell<Option<WebMemory>>>;

fn set_fn(env: &Object, name: &str, f: JsValue) -> Result<(), BridgeError> {
    Reflect::set(env, &JsValue::from_str(name), &f)
        .map(|_| ())
        .map_err(|e| BridgeError::LoadFailure(js_err(e)))
}

fn build_imports(link: &HostLink, audio: &Rc<AudioOut>, memory: &MemorySlot) -> Result<Object, BridgeError> {
    let env = Object::new();

    for (name, f) in UNARY_MATH {
        let c = Closure::wrap(Box::new(move |x: f64| f(x)) as Box<dyn FnMut(f64) -> f64>);
        set_fn(&env, name, c.into_js_value())?;
    }
    let c = Closure::wrap(Box::new(host::pow) as Box<dyn FnMut(f64, f64) -> f64>);
    set_fn(&env, names::POW, c.into_js_value())?;

    let mut rng = HostRandom::from_entropy();
    let c = Closure::wrap(Box::new(move || rng.next_unit()) as Box<dyn FnMut() -> f64>);
    set_fn(&env, names::RANDOM, c.into_js_value())?;

    let c = Closure::wrap(Box::new(host::now_ms) as Box<dyn FnMut() -> f64>);
    set_fn(&env, names::TIME, c.into_js_value())?;

    let c = Closure::wrap(Box::new(host::ping) as Box<dyn FnMut()>);
    set_fn(&env, names::PING, c.into_js_value())?;

    let l = link.clone();
    let c = Closure::wrap(Box::new(move || l.button_states()) as Box<dyn FnMut() -> u32>);
    set_fn(&env, names::BUTTON_STATES, c.into_js_value())?;

    // throwing unwinds the guest out of whatever it was doing
    let l = link.clone();
    let c = Closure::wrap(Box::new(move || -> Result<(), JsValue> {
        l.signal_panic();
        Err(JsValue::from_str("guest panic"))
    }) as Box<dyn FnMut() -> Result<(), JsValue>>);
    set_fn(&env, names::PANIC, c.into_js_value())?;

    let a = audio.clone();
    let c = Closure::wrap(Box::new(move |index: i32, hz: f32, amp: f32| {
        a.pool.set_voice(index, hz, amp)
    }) as Box<dyn FnMut(i32, f32, f32)>);
    set_fn(&env, names::SET_OSC, c.into_js_value())?;

    let m = memory.clone();
    let c = Closure::wrap(Box::new(move |ptr: u32, len: u32| {
        if let Some(mem) = m.borrow().as_ref() {
            host::log_string(mem, ptr, len);
        }
    }) as Box<dyn FnMut(u32, u32)>);
    set_fn(&env, names::LOG_STRING, c.into_js_value())?;

    let m = memory.clone();
    let c = Closure::wrap(Box::new(move |ptr: u32, len: u32, num: f64| {
        if let Some(mem) = m.borrow().as_ref() {
            host::log_string_and_number(mem, ptr, len, num);
        }
    }) as Box<dyn FnMut(u32, u32, f64)>);
    set_fn(&env, names::LOG_STRING_AND_NUMBER, c.into_js_value())?;

    let m = memory.clone();
    let c = Closure::wrap(Box::new(move |ptr: u32, len: u32| {
        if let Some(mem) = m.borrow().as_ref() {
            host::log_error_string(mem, ptr, len);
        }
    }) as Box<dyn FnMut(u32, u32)>);
    set_fn(&env, names::LOG_ERROR_STRING, c.into_js_value())?;

    let imports = Object::new();
    Reflect::set(&imports, &JsValue::from_str(IMPORT_MODULE), &env)
        .map_err(|e| BridgeError::LoadFailure(js_err(e)))?;
    Ok(imports)
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, BridgeError> {
    let window = web::window().ok_or_else(|| BridgeError::LoadFailure("no window".into()))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| BridgeError::LoadFailure(js_err(e)))?
        .dyn_into()
        .map_err(|e| BridgeError::LoadFailure(js_err(e)))?;
    if !resp.ok() {
        return Err(BridgeError::LoadFailure(format!(
            "{} answered {} {}",
            url,
            resp.status(),
            resp.status_text()
        )));
    }
    let buf = resp
        .array_buffer()
        .map_err(|e| BridgeError::LoadFailure(js_err(e)))?;
    let buf = JsFuture::from(buf)
        .await
        .map_err(|e| BridgeError::LoadFailure(js_err(e)))?;
    Ok(Uint8Array::new(&buf).to_vec())
}

fn export(exports: &Object, name: &str) -> Option<JsValue> {
    Reflect::get(exports, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined())
}

/// A pointer or size export may be a `WebAssembly.Global`, a getter function
/// or a plain number.
fn read_number(value: &JsValue) -> Option<f64> {
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    if let Some(f) = value.dyn_ref::<Function>() {
        return f.call0(&JsValue::NULL).ok().and_then(|v| v.as_f64());
    }
    Reflect::get(value, &JsValue::from_str("value"))
        .ok()
        .and_then(|v| v.as_f64())
}

fn read_u32(exports: &Object, name: &str) -> Option<u32> {
    export(exports, name)
        .and_then(|v| read_number(&v))
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n as u32)
}

fn resolve(exports: &Object, candidates: &[String]) -> Option<JsValue> {
    resolve_export(candidates, |n| export(exports, n).is_some()).and_then(|n| export(exports, n))
}

fn resolve_fn(exports: &Object, candidates: &[String]) -> Option<Function> {
    resolve(exports, candidates).and_then(|v| v.dyn_into::<Function>().ok())
}

/// Fetch, instantiate, run the entry point once, then locate redraw, pixels
/// and memory.
pub async fn load(
    url: &str,
    wanted: &ExportNames,
    link: &HostLink,
    audio: &Rc<AudioOut>,
) -> Result<Loaded, BridgeError> {
    let bytes = fetch_bytes(url).await?;
    log::info!("[bridge] fetched {} ({} bytes)", url, bytes.len());

    let memory: MemorySlot = Rc::new(RefCell::new(None));
    let imports = build_imports(link, audio, &memory)?;

    let result = JsFuture::from(WebAssembly::instantiate_buffer(&bytes, &imports))
        .await
        .map_err(|e| BridgeError::LoadFailure(js_err(e)))?;
    let instance: WebAssembly::Instance = Reflect::get(&result, &JsValue::from_str("instance"))
        .map_err(|e| BridgeError::LoadFailure(js_err(e)))?
        .dyn_into()
        .map_err(|e| BridgeError::LoadFailure(js_err(e)))?;
    let exports = instance.exports();

    let mem: WebAssembly::Memory = export(&exports, &wanted.memory)
        .and_then(|v| v.dyn_into().ok())
        .ok_or_else(|| BridgeError::MissingExport(wanted.memory.clone()))?;
    let mem = WebMemory(mem);
    *memory.borrow_mut() = Some(mem.clone());

    let entry = resolve_fn(&exports, &wanted.entry);
    let has_entry = entry.is_some();
    if let Some(entry) = entry {
        entry.call0(&JsValue::NULL).map_err(|e| {
            if link.has_panicked() {
                BridgeError::GuestPanic
            } else {
                BridgeError::GuestTrap(js_err(e))
            }
        })?;
    }

    let size = read_u32(&exports, &wanted.width).zip(read_u32(&exports, &wanted.height));
    let pixel_ptr = resolve(&exports, &wanted.pixels)
        .and_then(|v| read_number(&v))
        .and_then(host::guest_address);

    if !has_entry {
        return Ok(Loaded {
            guest: None,
            has_entry,
            pixel_ptr: pixel_ptr.unwrap_or(0),
            size,
        });
    }

    let pixel_ptr = pixel_ptr.ok_or_else(|| BridgeError::MissingExport(wanted.pixels.join("|")))?;
    let redraw = resolve_fn(&exports, &wanted.redraw)
        .ok_or_else(|| BridgeError::MissingExport(wanted.redraw.join("|")))?;
    log::info!(
        "[bridge] pixels at {:#x}, memory {} bytes",
        pixel_ptr,
        mem.byte_len()
    );

    Ok(Loaded {
        guest: Some(WebGuest {
            redraw,
            memory: mem,
        }),
        has_entry,
        pixel_ptr,
        size,
    })
}
