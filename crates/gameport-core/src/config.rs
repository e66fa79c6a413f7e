//! Per-module configuration supplied when an instance is built.

use crate::discretize::{DeadZoneShape, DEFAULT_DEAD_ZONE};
use crate::error::ConfigError;
use crate::keymap::KeyMapping;
use crate::pixels::MAX_BUFFER_EDGE;
use glam::Vec2;

/// Export names the bridge looks for, first match wins.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportNames {
    pub entry: Vec<String>,
    pub redraw: Vec<String>,
    pub pixels: Vec<String>,
    pub memory: String,
    pub width: String,
    pub height: String,
}

impl Default for ExportNames {
    fn default() -> Self {
        Self {
            entry: strings(&["main", "start"]),
            redraw: strings(&["on_redraw", "js_redraw_callback", "redraw"]),
            pixels: strings(&["PIXELS", "js_pixels"]),
            memory: "memory".to_string(),
            width: "PIXELS_WIDTH".to_string(),
            height: "PIXELS_HEIGHT".to_string(),
        }
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub module_url: String,
    pub logical_width: u32,
    pub logical_height: u32,
    pub key_mapping: KeyMapping,
    pub pixel_perfect: bool,
    pub dead_zone: f32,
    pub dead_zone_shape: DeadZoneShape,
    pub exports: ExportNames,
    /// Key codes the menu press zones stand in for.
    pub menu_left_key: String,
    pub menu_right_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl GameConfig {
    /// 256×192, smooth scale, standard key table.
    pub fn standard() -> Self {
        Self {
            module_url: "./app.wasm".to_string(),
            logical_width: 256,
            logical_height: 192,
            key_mapping: KeyMapping::standard(),
            pixel_perfect: false,
            dead_zone: DEFAULT_DEAD_ZONE,
            dead_zone_shape: DeadZoneShape::Square,
            exports: ExportNames::default(),
            menu_left_key: "Space".to_string(),
            menu_right_key: "Enter".to_string(),
        }
    }

    /// 240×160, integer scale, alternate key table.
    pub fn alternate() -> Self {
        Self {
            logical_width: 240,
            logical_height: 160,
            key_mapping: KeyMapping::alternate(),
            pixel_perfect: true,
            menu_left_key: "KeyU".to_string(),
            menu_right_key: "KeyE".to_string(),
            ..Self::standard()
        }
    }

    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name.trim() {
            "standard" => Ok(Self::standard()),
            "alternate" => Ok(Self::alternate()),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    /// Build from string attributes (the web front end passes `data-*`
    /// lookups). `preset` picks the base, every other key overrides it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup("preset") {
            Some(p) => Self::preset(&p)?,
            None => Self::standard(),
        };
        if let Some(url) = lookup("module") {
            cfg.module_url = url;
        }
        if let Some(v) = lookup("width") {
            cfg.logical_width = parse_value("width", &v)?;
        }
        if let Some(v) = lookup("height") {
            cfg.logical_height = parse_value("height", &v)?;
        }
        if let Some(v) = lookup("pixel-perfect") {
            cfg.pixel_perfect = parse_flag("pixel-perfect", &v)?;
        }
        if let Some(v) = lookup("keymap") {
            cfg.key_mapping = KeyMapping::parse(&v)?;
        }
        if let Some(v) = lookup("dead-zone") {
            cfg.dead_zone = parse_value("dead-zone", &v)?;
        }
        if let Some(v) = lookup("dead-zone-shape") {
            cfg.dead_zone_shape = DeadZoneShape::parse(&v).ok_or(ConfigError::InvalidValue {
                key: "dead-zone-shape",
                value: v,
            })?;
        }
        if let Some(v) = lookup("pixels-export") {
            cfg.exports.pixels = vec![v];
        }
        if let Some(v) = lookup("redraw-export") {
            cfg.exports.redraw = vec![v];
        }
        if let Some(v) = lookup("menu-left-key") {
            cfg.menu_left_key = v;
        }
        if let Some(v) = lookup("menu-right-key") {
            cfg.menu_right_key = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logical_width == 0 || self.logical_height == 0 {
            return Err(ConfigError::ZeroLogicalSize {
                width: self.logical_width,
                height: self.logical_height,
            });
        }
        if self.logical_width > MAX_BUFFER_EDGE || self.logical_height > MAX_BUFFER_EDGE {
            return Err(ConfigError::LogicalSizeTooLarge {
                width: self.logical_width,
                height: self.logical_height,
                max: MAX_BUFFER_EDGE,
            });
        }
        if !(0.0..1.0).contains(&self.dead_zone) {
            return Err(ConfigError::DeadZoneOutOfRange(self.dead_zone));
        }
        Ok(())
    }

    pub fn logical_size(&self) -> Vec2 {
        Vec2::new(self.logical_width as f32, self.logical_height as f32)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "" | "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key,
            value: other.to_string(),
        }),
    }
}
