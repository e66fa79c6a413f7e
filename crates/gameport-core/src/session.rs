//! One game instance: input, viewport, lifecycle and the frame cycle.
//!
//! Owned by the front end (one per canvas) instead of living in globals, so
//! several games can share a page.

use crate::bridge::{BridgeState, Guest};
use crate::config::GameConfig;
use crate::discretize::{AxisDiscretizer, DirectionalButtons, TouchDelta};
use crate::error::BridgeError;
use crate::event::HostEvent;
use crate::host::HostLink;
use crate::input::{InputState, TouchZone};
use crate::pixels::PixelBuffer;
use crate::viewport::ViewportGeometry;
use glam::Vec2;
use std::collections::VecDeque;

/// Output of one frame, ready to blit.
#[derive(Debug)]
pub struct Frame<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub geometry: ViewportGeometry,
    pub dt_ms: f64,
}

pub struct Session {
    config: GameConfig,
    input: InputState,
    dpad: AxisDiscretizer,
    face: AxisDiscretizer,
    link: HostLink,
    state: BridgeState,
    pending: VecDeque<HostEvent>,
    logical: Vec2,
    window: Vec2,
    viewport: ViewportGeometry,
    viewport_dirty: bool,
    pixels: Option<PixelBuffer>,
    last_frame_ms: Option<f64>,
    frames: u64,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        let input = InputState::new(config.key_mapping.clone());
        let link = HostLink::new(input.shared());
        let dpad = AxisDiscretizer::new(DirectionalButtons::DPAD, config.dead_zone)
            .with_shape(config.dead_zone_shape);
        let face = AxisDiscretizer::new(DirectionalButtons::FACE, config.dead_zone)
            .with_shape(config.dead_zone_shape);
        let logical = config.logical_size();
        Self {
            config,
            input,
            dpad,
            face,
            link,
            state: BridgeState::Unloaded,
            pending: VecDeque::new(),
            logical,
            window: logical,
            viewport: ViewportGeometry::fit(logical, logical, false),
            viewport_dirty: true,
            pixels: None,
            last_frame_ms: None,
            frames: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Handle for guest imports.
    pub fn link(&self) -> HostLink {
        self.link.clone()
    }

    pub fn viewport(&self) -> ViewportGeometry {
        self.viewport
    }

    pub fn logical_size(&self) -> Vec2 {
        self.logical
    }

    pub fn pixels(&self) -> Option<&PixelBuffer> {
        self.pixels.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    // ---------------- lifecycle ----------------

    pub fn begin_load(&mut self) -> Result<(), BridgeError> {
        self.state.begin_load()?;
        log::info!("[bridge] loading {}", self.config.module_url);
        Ok(())
    }

    /// Records a successful instantiation. `size` is the module-published
    /// buffer size when it exports one, which wins over the configured one.
    pub fn on_loaded(
        &mut self,
        has_entry: bool,
        pixel_ptr: usize,
        size: Option<(u32, u32)>,
    ) -> Result<(), BridgeError> {
        self.state.loaded(has_entry)?;
        let (w, h) = match size {
            Some((w, h)) if w > 0 && h > 0 => (w, h),
            _ => (self.config.logical_width, self.config.logical_height),
        };
        if (w, h) != (self.config.logical_width, self.config.logical_height) {
            log::info!(
                "[bridge] module publishes {}x{} (configured {}x{})",
                w,
                h,
                self.config.logical_width,
                self.config.logical_height
            );
        }
        let pixels = match PixelBuffer::new(pixel_ptr, w, h) {
            Ok(pixels) => pixels,
            Err(e) => return Err(self.fault(e)),
        };
        self.pixels = Some(pixels);
        self.logical = Vec2::new(w as f32, h as f32);
        self.resize(self.window.x, self.window.y);
        if has_entry {
            log::info!("[bridge] guest initialised");
        } else {
            log::warn!("[bridge] no entry point found; render loop will not start");
        }
        Ok(())
    }

    pub fn on_load_failed(&mut self, err: BridgeError) -> BridgeError {
        self.fault(err)
    }

    /// `Ready → Running`. False when there is nothing to run.
    pub fn start(&mut self) -> Result<bool, BridgeError> {
        let started = self.state.start()?;
        if started {
            self.last_frame_ms = None;
        }
        Ok(started)
    }

    /// Moves to `Faulted`, logs, and hands the error back.
    pub fn fault(&mut self, err: BridgeError) -> BridgeError {
        log::error!("[bridge] instance faulted: {}", err);
        self.state.fault();
        self.pending.clear();
        err
    }

    // ---------------- events ----------------

    /// While running, events wait for the next frame so the guest never sees
    /// half of a burst. Before that they apply at once; after a fault they are
    /// dropped.
    pub fn push(&mut self, event: HostEvent) {
        match self.state {
            BridgeState::Running => self.pending.push_back(event),
            BridgeState::Faulted => {}
            _ => self.apply(event),
        }
    }

    pub fn drain_events(&mut self) -> usize {
        let mut n = 0;
        while let Some(ev) = self.pending.pop_front() {
            self.apply(ev);
            n += 1;
        }
        n
    }

    fn apply(&mut self, event: HostEvent) {
        match event {
            HostEvent::KeyDown(code) => {
                self.input.apply_key_down(&code);
            }
            HostEvent::KeyUp(code) => {
                self.input.apply_key_up(&code);
            }
            HostEvent::Touch {
                zone,
                phase,
                vector,
            } => {
                let Some(disc) = self.discretizer(zone) else {
                    return;
                };
                let delta = if phase.is_contact() {
                    disc.discretize(vector)
                } else {
                    disc.release()
                };
                self.input.apply_touch_delta(zone, delta);
            }
            HostEvent::Press { zone, pressed } => {
                let code = match zone {
                    TouchZone::MenuLeft => &self.config.menu_left_key,
                    TouchZone::MenuRight => &self.config.menu_right_key,
                    _ => return,
                };
                let Some(button) = self.input.keymap().lookup(code) else {
                    return;
                };
                let delta = if pressed {
                    TouchDelta {
                        set: button.into(),
                        clear: Default::default(),
                    }
                } else {
                    TouchDelta::release(button.into())
                };
                self.input.apply_touch_delta(zone, delta);
            }
            HostEvent::Resize { width, height } => {
                self.resize(width, height);
            }
            HostEvent::Blur => self.input.release_all(),
        }
    }

    fn discretizer(&self, zone: TouchZone) -> Option<AxisDiscretizer> {
        match zone {
            TouchZone::Dpad => Some(self.dpad),
            TouchZone::Face => Some(self.face),
            TouchZone::MenuLeft | TouchZone::MenuRight => None,
        }
    }

    // ---------------- viewport ----------------

    pub fn resize(&mut self, width: f32, height: f32) -> ViewportGeometry {
        self.window = Vec2::new(width, height);
        let geometry = ViewportGeometry::fit(self.window, self.logical, self.config.pixel_perfect);
        if geometry != self.viewport {
            log::debug!(
                "[viewport] {}x{} -> scale {:.3} offset ({}, {})",
                width,
                height,
                geometry.scale,
                geometry.offset.x,
                geometry.offset.y
            );
        }
        self.viewport = geometry;
        self.viewport_dirty = true;
        geometry
    }

    pub fn window_size(&self) -> Vec2 {
        self.window
    }

    /// Geometry changed since the last call.
    pub fn take_viewport_change(&mut self) -> Option<ViewportGeometry> {
        std::mem::take(&mut self.viewport_dirty).then_some(self.viewport)
    }

    // ---------------- frame ----------------

    /// One animation-frame tick: apply queued input, run the guest's redraw
    /// with the elapsed time, then copy its pixels out.
    ///
    /// `Ok(None)` when not running. An error means the instance is now
    /// `Faulted` and the caller should stop scheduling frames.
    pub fn frame<G: Guest>(
        &mut self,
        now_ms: f64,
        guest: &mut G,
    ) -> Result<Option<Frame<'_>>, BridgeError> {
        if !self.state.is_running() {
            return Ok(None);
        }
        self.drain_events();

        let dt_ms = self
            .last_frame_ms
            .map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_frame_ms = Some(now_ms);

        let redraw = guest.redraw(dt_ms);
        if self.link.has_panicked() {
            return Err(self.fault(BridgeError::GuestPanic));
        }
        if let Err(e) = redraw {
            return Err(self.fault(e));
        }

        let synced = match self.pixels.as_mut() {
            Some(p) => p.sync(guest.memory()).map(|_| ()),
            None => return Ok(None),
        };
        if let Err(e) = synced {
            return Err(self.fault(e));
        }
        self.frames += 1;

        let geometry = self.viewport;
        Ok(self.pixels.as_ref().map(|p| Frame {
            pixels: p.frame(),
            width: p.width(),
            height: p.height(),
            geometry,
            dt_ms,
        }))
    }
}
