// Frame cycle of a session against a scripted guest.

use gameport_core::*;
use glam::Vec2;

const W: u32 = 4;
const H: u32 = 2;
const PTR: usize = 16;

/// Writes a frame counter into every pixel byte and records what it saw.
struct ScriptedGuest {
    link: HostLink,
    memory: Vec<u8>,
    dts: Vec<f64>,
    buttons_seen: Vec<u32>,
    panic_on: Option<usize>,
    trap_on: Option<usize>,
    grow_on: Option<usize>,
}

impl ScriptedGuest {
    fn new(link: HostLink) -> Self {
        Self {
            link,
            memory: vec![0; 64],
            dts: Vec::new(),
            buttons_seen: Vec::new(),
            panic_on: None,
            trap_on: None,
            grow_on: None,
        }
    }
}

impl Guest for ScriptedGuest {
    type Memory = Vec<u8>;

    fn redraw(&mut self, dt_ms: f64) -> Result<(), BridgeError> {
        let n = self.dts.len();
        self.dts.push(dt_ms);
        self.buttons_seen.push(self.link.button_states());
        if self.panic_on == Some(n) {
            self.link.signal_panic();
            return Err(BridgeError::GuestTrap("unreachable".into()));
        }
        if self.trap_on == Some(n) {
            return Err(BridgeError::GuestTrap("integer overflow".into()));
        }
        if self.grow_on == Some(n) {
            // a fresh, larger backing store; the old one is gone
            let mut grown = vec![0; self.memory.len() * 2];
            grown[..self.memory.len()].copy_from_slice(&self.memory);
            self.memory = grown;
        }
        let len = (W * H) as usize * 4;
        for b in &mut self.memory[PTR..PTR + len] {
            *b = n as u8 + 1;
        }
        Ok(())
    }

    fn memory(&self) -> &Vec<u8> {
        &self.memory
    }
}

fn running(config: GameConfig) -> (Session, ScriptedGuest) {
    let mut session = Session::new(config);
    session.begin_load().unwrap();
    session.on_loaded(true, PTR, Some((W, H))).unwrap();
    assert_eq!(session.start(), Ok(true));
    let guest = ScriptedGuest::new(session.link());
    (session, guest)
}

#[test]
fn first_frame_has_zero_dt_then_elapsed_time() {
    let (mut s, mut g) = running(GameConfig::standard());
    s.frame(1000.0, &mut g).unwrap();
    s.frame(1016.5, &mut g).unwrap();
    s.frame(1050.0, &mut g).unwrap();
    assert_eq!(g.dts, vec![0.0, 16.5, 33.5]);
    assert_eq!(s.frames(), 3);
}

#[test]
fn frame_copies_guest_pixels() {
    let (mut s, mut g) = running(GameConfig::standard());
    let frame = s.frame(0.0, &mut g).unwrap().unwrap();
    assert_eq!((frame.width, frame.height), (W, H));
    assert_eq!(frame.pixels.len(), (W * H * 4) as usize);
    assert!(frame.pixels.iter().all(|&b| b == 1));
}

#[test]
fn queued_input_is_visible_to_the_next_redraw() {
    let (mut s, mut g) = running(GameConfig::standard());
    s.push(HostEvent::KeyDown("KeyD".into()));
    s.push(HostEvent::KeyDown("Enter".into()));
    assert_eq!(s.pending_events(), 2);
    // nothing published until the frame drains the queue
    assert_eq!(s.link().button_states(), 0);

    s.frame(0.0, &mut g).unwrap();
    let expected = (LogicalButton::Right.bit() | LogicalButton::Start.bit()) as u32;
    assert_eq!(g.buttons_seen, vec![expected]);
    assert_eq!(s.pending_events(), 0);
}

#[test]
fn key_held_through_touch_release_keeps_up() {
    let (mut s, mut g) = running(GameConfig::standard());
    s.push(HostEvent::KeyDown("KeyW".into()));
    s.push(HostEvent::Touch {
        zone: TouchZone::Dpad,
        phase: TouchPhase::Start,
        vector: Vec2::new(0.0, -0.9),
    });
    s.push(HostEvent::Touch {
        zone: TouchZone::Dpad,
        phase: TouchPhase::End,
        vector: Vec2::ZERO,
    });
    s.frame(0.0, &mut g).unwrap();
    assert_eq!(g.buttons_seen, vec![LogicalButton::Up.bit() as u32]);
}

#[test]
fn pointer_up_releases_every_pad_button() {
    let (mut s, mut g) = running(GameConfig::standard());
    for v in [Vec2::new(-0.8, -0.8), Vec2::new(0.9, 0.1), Vec2::new(0.5, 0.9)] {
        s.push(HostEvent::Touch {
            zone: TouchZone::Face,
            phase: TouchPhase::Move,
            vector: v,
        });
    }
    s.frame(0.0, &mut g).unwrap();
    assert_ne!(g.buttons_seen[0], 0);

    s.push(HostEvent::Touch {
        zone: TouchZone::Face,
        phase: TouchPhase::Cancel,
        vector: Vec2::new(0.9, 0.9),
    });
    s.frame(16.0, &mut g).unwrap();
    assert_eq!(g.buttons_seen[1], 0);
}

#[test]
fn menu_zones_press_their_configured_keys() {
    let (mut s, mut g) = running(GameConfig::standard());
    s.push(HostEvent::Press {
        zone: TouchZone::MenuLeft,
        pressed: true,
    });
    s.push(HostEvent::Press {
        zone: TouchZone::MenuRight,
        pressed: true,
    });
    s.frame(0.0, &mut g).unwrap();
    let both = (LogicalButton::Select.bit() | LogicalButton::Start.bit()) as u32;
    assert_eq!(g.buttons_seen[0], both);

    s.push(HostEvent::Press {
        zone: TouchZone::MenuLeft,
        pressed: false,
    });
    s.frame(1.0, &mut g).unwrap();
    assert_eq!(g.buttons_seen[1], LogicalButton::Start.bit() as u32);
}

#[test]
fn blur_releases_everything() {
    let (mut s, mut g) = running(GameConfig::standard());
    s.push(HostEvent::KeyDown("KeyA".into()));
    s.push(HostEvent::Blur);
    s.frame(0.0, &mut g).unwrap();
    assert_eq!(g.buttons_seen, vec![0]);
}

#[test]
fn memory_growth_is_read_fresh() {
    let (mut s, mut g) = running(GameConfig::standard());
    g.grow_on = Some(1);
    s.frame(0.0, &mut g).unwrap();
    let frame = s.frame(16.0, &mut g).unwrap().unwrap();
    assert!(frame.pixels.iter().all(|&b| b == 2));
    assert_eq!(s.pixels().unwrap().rebinds(), 1);
}

#[test]
fn guest_panic_faults_and_stops_frames() {
    let (mut s, mut g) = running(GameConfig::standard());
    g.panic_on = Some(1);
    s.frame(0.0, &mut g).unwrap();
    assert_eq!(s.frame(16.0, &mut g).unwrap_err(), BridgeError::GuestPanic);
    assert!(s.state().is_faulted());

    // later ticks do nothing and input is dropped
    s.push(HostEvent::KeyDown("KeyW".into()));
    assert!(s.frame(32.0, &mut g).unwrap().is_none());
    assert_eq!(g.dts.len(), 2);
    assert_eq!(s.pending_events(), 0);
}

#[test]
fn guest_trap_faults() {
    let (mut s, mut g) = running(GameConfig::standard());
    g.trap_on = Some(0);
    assert!(matches!(
        s.frame(0.0, &mut g),
        Err(BridgeError::GuestTrap(_))
    ));
    assert_eq!(s.state(), BridgeState::Faulted);
}

#[test]
fn pixel_buffer_past_memory_end_faults() {
    let mut s = Session::new(GameConfig::standard());
    s.begin_load().unwrap();
    s.on_loaded(true, 60, Some((W, H))).unwrap();
    s.start().unwrap();
    // 60 + 32 bytes does not fit in the guest's 64
    let mut g = ScriptedGuest::new(s.link());
    assert!(matches!(
        s.frame(0.0, &mut g),
        Err(BridgeError::PixelBufferOutOfBounds { .. })
    ));
}

#[test]
fn missing_entry_never_runs() {
    let mut s = Session::new(GameConfig::standard());
    s.begin_load().unwrap();
    s.on_loaded(false, PTR, None).unwrap();
    assert_eq!(s.start(), Ok(false));
    let mut g = ScriptedGuest::new(s.link());
    assert!(s.frame(0.0, &mut g).unwrap().is_none());
    assert!(g.dts.is_empty());
}

#[test]
fn input_before_running_applies_immediately() {
    let mut s = Session::new(GameConfig::standard());
    s.push(HostEvent::KeyDown("KeyS".into()));
    assert_eq!(s.link().button_states(), LogicalButton::Down.bit() as u32);
    assert_eq!(s.pending_events(), 0);
}

#[test]
fn published_size_overrides_configured_size() {
    let mut s = Session::new(GameConfig::standard());
    s.resize(1920.0, 1080.0);
    s.begin_load().unwrap();
    s.on_loaded(true, 0, Some((320, 240))).unwrap();
    assert_eq!(s.logical_size(), Vec2::new(320.0, 240.0));
    assert_eq!(s.viewport().size, Vec2::new(1440.0, 1080.0));
}

#[test]
fn resize_event_refits_viewport() {
    let mut cfg = GameConfig::standard();
    cfg.pixel_perfect = true;
    let (mut s, mut g) = running(cfg);
    let _ = s.take_viewport_change();
    s.push(HostEvent::Resize {
        width: 1920.0,
        height: 1080.0,
    });
    assert!(s.take_viewport_change().is_none());
    s.frame(0.0, &mut g).unwrap();
    let geometry = s.take_viewport_change().unwrap();
    // logical size here is the guest's 4x2 buffer
    assert_eq!(geometry.scale, 480.0);
    assert!(s.take_viewport_change().is_none());
}

#[test]
fn double_load_is_rejected() {
    let mut s = Session::new(GameConfig::standard());
    s.begin_load().unwrap();
    assert!(matches!(
        s.begin_load(),
        Err(BridgeError::InvalidTransition { event: "begin_load", .. })
    ));
}

#[test]
fn oversized_published_size_faults_instead_of_allocating() {
    let mut s = Session::new(GameConfig::standard());
    s.begin_load().unwrap();
    assert_eq!(
        s.on_loaded(true, 0, Some((u32::MAX, u32::MAX))),
        Err(BridgeError::PixelBufferTooLarge {
            width: u32::MAX,
            height: u32::MAX
        })
    );
    assert!(s.state().is_faulted());
    assert!(matches!(
        s.start(),
        Err(BridgeError::InvalidTransition { from: "Faulted", .. })
    ));
}

#[test]
fn touch_end_releases_pad_even_with_a_vector() {
    let (mut s, mut g) = running(GameConfig::standard());
    s.push(HostEvent::Touch {
        zone: TouchZone::Dpad,
        phase: TouchPhase::Start,
        vector: Vec2::new(0.0, -0.9),
    });
    s.frame(0.0, &mut g).unwrap();
    assert_eq!(g.buttons_seen[0], LogicalButton::Up.bit() as u32);

    // a second finger still resting on the pad does not hold it
    s.push(HostEvent::Touch {
        zone: TouchZone::Dpad,
        phase: TouchPhase::End,
        vector: Vec2::new(0.0, -0.9),
    });
    s.frame(16.0, &mut g).unwrap();
    assert_eq!(g.buttons_seen[1], 0);
}

#[test]
fn panic_in_entry_point_never_reaches_running() {
    let mut s = Session::new(GameConfig::standard());
    s.begin_load().unwrap();
    s.link().signal_panic();
    let err = s.on_load_failed(BridgeError::GuestPanic);
    assert_eq!(err, BridgeError::GuestPanic);
    assert!(s.state().is_faulted());
    assert!(!s.state().is_running());
    assert!(s.start().is_err());
}
