/// DOM hooks and audio tuning for the web front end.
///
/// Kept free of `web_sys` types so the host-side tests can `include!` it.

// Every canvas carrying a module URL becomes its own instance
pub const INSTANCE_SELECTOR: &str = "canvas[data-module]";

// `data-*` attribute prefix read into `GameConfig`
pub const DATA_PREFIX: &str = "data-";

// Front-end-only attribute: build the touch gamepad next to the canvas
pub const GAMEPAD_ATTR: &str = "gamepad";

// Class toggles
pub const PRESSED_CLASS: &str = "pressed";
pub const FULLSCREEN_CLASS: &str = "fullscreen";

// Gamepad shell markup hooks
pub const GAMEPAD_CLASS: &str = "gamepad";
pub const DPAD_PAD_SELECTOR: &str = ".touchpad.left";
pub const FACE_PAD_SELECTOR: &str = ".touchpad.right";
pub const MENU_LEFT_ID: &str = "menuLeft";
pub const MENU_RIGHT_ID: &str = "menuRight";
pub const FULLSCREEN_ICON_ID: &str = "fullscreenIcon";
pub const BACK_BUTTON_ID: &str = "backButton";

/// Icon element ids, paired with the logical button name each one lights.
pub const ICON_IDS: [(&str, &str); 8] = [
    ("up", "UP"),
    ("down", "DOWN"),
    ("left", "LEFT"),
    ("right", "RIGHT"),
    ("north", "NORTH"),
    ("south", "SOUTH"),
    ("west", "WEST"),
    ("east", "EAST"),
];

// Looping white noise behind the noise voice (seconds)
pub const NOISE_BUFFER_SECS: f32 = 2.0;

// Silence until the guest writes a voice
pub const INITIAL_VOICE_GAIN: f32 = 0.0;
