//! Installation settings, loaded once at startup from `settings.json`.
//!
//! Key names follow the settings files already deployed with the
//! installation. Colors are `"r,g,b"` strings, launcher colors `"r,g,b,a"`
//! and positions `"x,y"`. Optional sections fall back to the defaults below.

use crane_shared::color::{PointStr, Rgb, Rgba};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::ConfigError;
use crate::traveler::TravelerTimings;

fn default_secs_between_launches() -> f64 {
    0.25
}

fn default_secs_visible() -> f64 {
    5.0
}

fn default_tick_rate_hz() -> u32 {
    60
}

fn default_gc_interval_secs() -> f64 {
    5.0
}

fn default_inner() -> Rgba {
    Rgba::new(240, 240, 240, 0)
}

fn default_border() -> Rgba {
    Rgba::new(215, 185, 140, 0)
}

fn default_wave() -> Rgba {
    Rgba::new(255, 222, 166, 0)
}

/// Outbound OSC endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderConfig {
    pub ip: String,
    pub port: u16,
}

/// Inbound crane datagram listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverConfig {
    pub port: u16,
    /// Interface to bind. Defaults to all interfaces.
    #[serde(default = "ReceiverConfig::default_bind_ip")]
    pub bind_ip: String,
}

impl ReceiverConfig {
    fn default_bind_ip() -> String {
        "0.0.0.0".to_string()
    }
}

/// Accepted crane color and how it is shown on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorEntry {
    pub rgb: Rgb,
    pub threshold: f64,
    pub representation: Rgb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherEntry {
    pub id: String,
    pub position: PointStr,
    #[serde(default = "default_inner")]
    pub rgb: Rgba,
    #[serde(default = "default_border")]
    pub border: Rgba,
    #[serde(default = "default_wave")]
    pub wave: Rgba,
    pub min_angle: f64,
    pub max_angle: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

/// WebSocket feed for rendering clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub listen_addr: String,
    pub broadcast_rate_hz: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:9001".to_string(),
            broadcast_rate_hz: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationConfig {
    #[serde(default = "default_secs_between_launches")]
    pub secs_between_launches: f64,
    #[serde(default = "default_secs_visible")]
    pub secs_traveller_fully_visible: f64,
    #[serde(default = "default_secs_visible")]
    pub secs_traveller_fade: f64,
    pub sender: SenderConfig,
    pub receiver: ReceiverConfig,
    #[serde(default)]
    pub colors: Vec<ColorEntry>,
    #[serde(default)]
    pub launchers: Vec<LauncherEntry>,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,
    #[serde(default = "default_gc_interval_secs")]
    pub gc_interval_secs: f64,
}

impl InstallationConfig {
    /// Read, parse and validate a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let durations = [
            ("secs_between_launches", self.secs_between_launches),
            ("secs_traveller_fully_visible", self.secs_traveller_fully_visible),
            ("secs_traveller_fade", self.secs_traveller_fade),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be finite and >= 0", name));
            }
        }
        if !self.gc_interval_secs.is_finite() || self.gc_interval_secs <= 0.0 {
            return Err("gc_interval_secs must be finite and > 0".to_string());
        }
        if self.tick_rate_hz == 0 {
            return Err("tick_rate_hz must be > 0".to_string());
        }
        if self.viewer.broadcast_rate_hz == 0 || self.viewer.broadcast_rate_hz > self.tick_rate_hz {
            return Err("viewer.broadcast_rate_hz must be in 1..=tick_rate_hz".to_string());
        }
        if self.sender.port == 0 {
            return Err("sender.port must be > 0".to_string());
        }
        if self.receiver.port == 0 {
            return Err("receiver.port must be > 0".to_string());
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err("viewport must have a positive size".to_string());
        }
        for color in &self.colors {
            if !color.threshold.is_finite() || color.threshold <= 0.0 {
                return Err(format!("threshold for color {} must be > 0", color.rgb));
            }
        }
        let mut ids = HashSet::new();
        for launcher in &self.launchers {
            if !ids.insert(launcher.id.as_str()) {
                return Err(format!("duplicate launcher id {:?}", launcher.id));
            }
            if !launcher.min_angle.is_finite() || !launcher.max_angle.is_finite() {
                return Err(format!("launcher {:?} has non-finite angles", launcher.id));
            }
            if !launcher.position.0.is_finite() {
                return Err(format!("launcher {:?} has a non-finite position", launcher.id));
            }
        }
        Ok(())
    }

    pub fn traveler_timings(&self) -> TravelerTimings {
        TravelerTimings {
            fully_visible: self.secs_traveller_fully_visible,
            fade: self.secs_traveller_fade,
        }
    }

    pub fn sender_addr(&self) -> String {
        format!("{}:{}", self.sender.ip, self.sender.port)
    }

    pub fn receiver_addr(&self) -> String {
        format!("{}:{}", self.receiver.bind_ip, self.receiver.port)
    }
}
