//! Physical key code (`KeyboardEvent.code`) to [`LogicalButton`] tables.

use crate::button::LogicalButton;
use crate::error::ConfigError;
use fnv::FnvHashMap;

const DIRECTIONAL: [(&str, LogicalButton); 12] = [
    ("KeyW", LogicalButton::Up),
    ("KeyS", LogicalButton::Down),
    ("KeyA", LogicalButton::Left),
    ("KeyD", LogicalButton::Right),
    ("KeyI", LogicalButton::North),
    ("KeyK", LogicalButton::South),
    ("KeyJ", LogicalButton::West),
    ("KeyL", LogicalButton::East),
    ("ArrowUp", LogicalButton::RUp),
    ("ArrowDown", LogicalButton::RDown),
    ("ArrowLeft", LogicalButton::RLeft),
    ("ArrowRight", LogicalButton::RRight),
];

const STANDARD_EXTRA: [(&str, LogicalButton); 4] = [
    ("KeyE", LogicalButton::L),
    ("KeyU", LogicalButton::R),
    ("Space", LogicalButton::Select),
    ("Enter", LogicalButton::Start),
];

const ALTERNATE_EXTRA: [(&str, LogicalButton); 4] = [
    ("KeyR", LogicalButton::L),
    ("KeyF", LogicalButton::R),
    ("KeyU", LogicalButton::Select),
    ("KeyE", LogicalButton::Start),
];

/// Immutable key table. Several codes may map to the same button.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyMapping {
    entries: FnvHashMap<String, LogicalButton>,
}

impl KeyMapping {
    /// WASD / IJKL / arrows, `E`/`U` triggers, `Space` select, `Enter` start.
    pub fn standard() -> Self {
        Self::from_pairs(DIRECTIONAL.into_iter().chain(STANDARD_EXTRA))
    }

    /// Same directions, `R`/`F` triggers, `U` select, `E` start.
    pub fn alternate() -> Self {
        Self::from_pairs(DIRECTIONAL.into_iter().chain(ALTERNATE_EXTRA))
    }

    pub fn named(name: &str) -> Option<Self> {
        match name.trim() {
            "standard" => Some(Self::standard()),
            "alternate" => Some(Self::alternate()),
            _ => None,
        }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, LogicalButton)>,
        S: Into<String>,
    {
        Self {
            entries: pairs.into_iter().map(|(k, b)| (k.into(), b)).collect(),
        }
    }

    /// Parse `"KeyW=UP, KeyS=DOWN, Space=SELECT"`. A preset name is accepted
    /// as well so config attributes can say `data-keymap="alternate"`.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        if let Some(preset) = Self::named(text) {
            return Ok(preset);
        }
        let mut entries = FnvHashMap::default();
        for entry in text.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (code, button) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedMapping(entry.to_string()))?;
            let code = code.trim();
            if code.is_empty() {
                return Err(ConfigError::MalformedMapping(entry.to_string()));
            }
            let button = LogicalButton::from_name(button)
                .ok_or_else(|| ConfigError::UnknownButton(button.trim().to_string()))?;
            entries.insert(code.to_string(), button);
        }
        Ok(Self { entries })
    }

    /// Returns a copy with one extra (or replaced) entry.
    pub fn with(mut self, code: impl Into<String>, button: LogicalButton) -> Self {
        self.entries.insert(code.into(), button);
        self
    }

    #[inline]
    pub fn lookup(&self, code: &str) -> Option<LogicalButton> {
        self.entries.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, LogicalButton)> {
        self.entries.iter().map(|(k, b)| (k.as_str(), *b))
    }
}

impl Default for KeyMapping {
    fn default() -> Self {
        Self::standard()
    }
}
