//! Host functions offered to the guest under the `env` import module.
//!
//! Everything here is platform-free; the web front end wraps these in JS
//! closures when it builds the import object.

use crate::input::SharedButtons;
use crate::pixels::GuestMemory;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const IMPORT_MODULE: &str = "env";

pub mod names {
    pub const PING: &str = "js_ping";
    pub const PANIC: &str = "js_panic";
    pub const BUTTON_STATES: &str = "js_button_states";
    pub const SET_OSC: &str = "js_set_osc";
    pub const LOG_STRING: &str = "js_log_string";
    pub const LOG_STRING_AND_NUMBER: &str = "js_log_string_and_number";
    pub const LOG_ERROR_STRING: &str = "js_log_error_string";
    pub const POW: &str = "js_pow";
    pub const RANDOM: &str = "js_random";
    pub const TIME: &str = "js_time";
}

pub const ERROR_TAG: &str = "WASM Error: ";

/// Single-argument math imports. Pure pass-through to `f64`.
pub const UNARY_MATH: [(&str, fn(f64) -> f64); 10] = [
    ("js_sin", f64::sin),
    ("js_cos", f64::cos),
    ("js_tan", f64::tan),
    ("js_asin", f64::asin),
    ("js_acos", f64::acos),
    ("js_atan", f64::atan),
    ("js_sqrt", f64::sqrt),
    ("js_floor", f64::floor),
    ("js_ceil", f64::ceil),
    ("js_round", js_round),
];

#[inline]
pub fn pow(base: f64, exp: f64) -> f64 {
    base.powf(exp)
}

/// Rounds half toward positive infinity, matching `Math.round`
/// (`-2.5 → -2`, unlike `f64::round`).
pub fn js_round(x: f64) -> f64 {
    let f = x.floor();
    if x - f >= 0.5 {
        f + 1.0
    } else {
        f
    }
}

/// Guest addresses arrive as JS numbers read off `i32` globals, so anything at
/// or above 2 GiB shows up negative. Reinterprets the low 32 bits.
pub fn guest_address(n: f64) -> Option<usize> {
    if !n.is_finite() || n < i32::MIN as f64 || n > u32::MAX as f64 {
        return None;
    }
    Some(n as i64 as u32 as usize)
}

/// `js_ping`, a liveness probe guests call during bring-up.
pub fn ping() {
    log::info!("[guest] ping");
}

/// Monotonic milliseconds since an arbitrary epoch.
#[inline]
pub fn now_ms() -> f64 {
    instant::now()
}

/// Uniform `[0, 1)` source behind `js_random`.
#[derive(Debug)]
pub struct HostRandom(StdRng);

impl HostRandom {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// One char per byte, Latin-1 style. Guests only log ASCII.
pub fn decode_guest_str(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

pub fn read_guest_str<M: GuestMemory + ?Sized>(memory: &M, ptr: u32, len: u32) -> Option<String> {
    match memory.read_vec(ptr as usize, len as usize) {
        Ok(bytes) => Some(decode_guest_str(&bytes)),
        Err(e) => {
            log::warn!("[guest] unreadable log string: {}", e);
            None
        }
    }
}

pub fn log_string<M: GuestMemory + ?Sized>(memory: &M, ptr: u32, len: u32) {
    if let Some(s) = read_guest_str(memory, ptr, len) {
        log::info!(target: "guest", "{}", s);
    }
}

pub fn log_string_and_number<M: GuestMemory + ?Sized>(memory: &M, ptr: u32, len: u32, num: f64) {
    if let Some(s) = read_guest_str(memory, ptr, len) {
        log::info!(target: "guest", "{}{}", s, num);
    }
}

pub fn log_error_string<M: GuestMemory + ?Sized>(memory: &M, ptr: u32, len: u32) {
    if let Some(s) = read_guest_str(memory, ptr, len) {
        log::warn!(target: "guest", "{}{}", ERROR_TAG, s);
    }
}

/// The slice of instance state guest imports may touch while the guest is
/// running: the published button word and the panic flag. Cloned into each
/// import closure.
#[derive(Clone, Debug, Default)]
pub struct HostLink {
    buttons: SharedButtons,
    panicked: Arc<AtomicBool>,
}

impl HostLink {
    pub fn new(buttons: SharedButtons) -> Self {
        Self {
            buttons,
            panicked: Arc::new(AtomicBool::new(false)),
        }
    }

    /// `js_button_states`
    #[inline]
    pub fn button_states(&self) -> u32 {
        self.buttons.get() as u32
    }

    /// `js_panic`. The caller still has to unwind the guest (throw).
    pub fn signal_panic(&self) {
        if !self.panicked.swap(true, Ordering::AcqRel) {
            log::error!("[guest] panic!");
        }
    }

    pub fn has_panicked(&self) -> bool {
        self.panicked.load(Ordering::Acquire)
    }
}
