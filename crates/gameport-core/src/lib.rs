//! Platform-free core of gameport.
//!
//! Touch vectors become directional button deltas, deltas and physical keys
//! are folded into the 16-bit word guests read, and a [`Session`] drives the
//! guest's redraw cycle and scales its pixel buffer to the window. Nothing in
//! here touches browser APIs; the web front end adapts these types to the DOM,
//! Web Audio and `WebAssembly.instantiate`.

pub mod bridge;
pub mod button;
pub mod config;
pub mod discretize;
pub mod error;
pub mod event;
pub mod host;
pub mod input;
pub mod keymap;
pub mod pixels;
pub mod session;
pub mod tone;
pub mod touch;
pub mod viewport;

pub use bridge::{resolve_export, BridgeState, Guest};
pub use button::{ButtonSet, LogicalButton};
pub use config::{ExportNames, GameConfig};
pub use discretize::{
    AxisDiscretizer, AxisState, DeadZoneShape, DirectionalButtons, TouchDelta, DEFAULT_DEAD_ZONE,
};
pub use error::{BridgeError, ConfigError};
pub use event::{HostEvent, TouchPhase};
pub use host::{HostLink, HostRandom};
pub use input::{InputState, SharedButtons, TouchZone};
pub use keymap::KeyMapping;
pub use pixels::{GuestMemory, PixelBuffer, MAX_BUFFER_EDGE};
pub use session::{Frame, Session};
pub use tone::{Pitch, ToneGenerator, TonePool, ToneVoice, VoiceKind};
pub use touch::{touch_vector, ControlSurface};
pub use viewport::{compute_offset, compute_size, window_device_size, ViewportGeometry};
