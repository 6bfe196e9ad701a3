// Engine tuning constants and runtime configuration.

use std::path::Path;

use macroquad::prelude::Color;
use serde::Deserialize;

use crate::color;
use crate::error::EngineError;

// Surface
pub const DEFAULT_WIDTH: f32 = 800.0;
pub const DEFAULT_HEIGHT: f32 = 600.0;

// Simulation
/// One frame advances particle progress by `1 / DEFAULT_TIME_SCALE`.
pub const DEFAULT_TIME_SCALE: f32 = 2.5;

// Trigger limits
/// Upper bound on particles a single trigger may spawn.
pub const MAX_TRIGGER_PARTICLES: usize = 5_000;
pub const MAX_INTENSITY: f32 = 50.0;
pub const MAX_DURATION_SCALE: f32 = 20.0;

// Diagnostics
pub const FPS_WINDOW_MS: f64 = 1000.0;
pub const FRAME_HISTORY: usize = 240;
pub const HUD_FONT_SIZE: f32 = 18.0;
pub const HUD_LINE_HEIGHT: f32 = 20.0;
pub const HUD_MARGIN: f32 = 10.0;

/// How the surface is cleared at the start of each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum Background {
    #[default]
    Transparent,
    Solid(Color),
}

impl Background {
    pub fn parse(value: &str) -> Result<Self, EngineError> {
        if value.trim().eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }
        color::parse_hex(value).map(Self::Solid)
    }
}

impl TryFrom<String> for Background {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub width: f32,
    pub height: f32,
    pub time_scale: f32,
    pub background: Background,
    pub show_fps: bool,
    pub show_particle_count: bool,
    /// Seed for the RNG lent to effects; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            time_scale: DEFAULT_TIME_SCALE,
            background: Background::Transparent,
            show_fps: false,
            show_particle_count: false,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Progress added to every particle per frame.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.time_scale
    }

    /// Check every field the way `apply` checks a patch.
    pub fn validate(&self) -> Result<(), EngineError> {
        ConfigPatch::from(self).validate()
    }

    /// Validate `patch` and merge it in. Returns whether the surface size changed.
    /// On error nothing is applied.
    pub fn apply(&mut self, patch: &ConfigPatch) -> Result<bool, EngineError> {
        patch.validate()?;

        let mut resized = false;
        if let Some(width) = patch.width {
            resized |= width != self.width;
            self.width = width;
        }
        if let Some(height) = patch.height {
            resized |= height != self.height;
            self.height = height;
        }
        if let Some(time_scale) = patch.time_scale {
            self.time_scale = time_scale;
        }
        if let Some(background) = patch.background_color {
            self.background = background;
        }
        if let Some(show_fps) = patch.show_fps {
            self.show_fps = show_fps;
        }
        if let Some(show_count) = patch.show_particle_count {
            self.show_particle_count = show_count;
        }
        if patch.seed.is_some() {
            self.seed = patch.seed;
        }
        Ok(resized)
    }
}

/// Partial configuration merged by `ParticleSystem::update_config`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigPatch {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub time_scale: Option<f32>,
    pub background_color: Option<Background>,
    pub show_fps: Option<bool>,
    pub show_particle_count: Option<bool>,
    pub seed: Option<u64>,
}

impl ConfigPatch {
    pub fn size(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = Some(time_scale);
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.background_color = Some(background);
        self
    }

    pub fn show_fps(mut self, show: bool) -> Self {
        self.show_fps = Some(show);
        self
    }

    pub fn show_particle_count(mut self, show: bool) -> Self {
        self.show_particle_count = Some(show);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<(), EngineError> {
        for (key, value) in [("width", self.width), ("height", self.height)] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(EngineError::InvalidConfig(format!(
                        "{key} must be a positive number, got {v}"
                    )));
                }
            }
        }
        if let Some(ts) = self.time_scale {
            if !ts.is_finite() || ts <= 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "timeScale must be a positive number, got {ts}"
                )));
            }
        }
        Ok(())
    }
}

impl From<&EngineConfig> for ConfigPatch {
    fn from(config: &EngineConfig) -> Self {
        Self {
            width: Some(config.width),
            height: Some(config.height),
            time_scale: Some(config.time_scale),
            background_color: Some(config.background),
            show_fps: Some(config.show_fps),
            show_particle_count: Some(config.show_particle_count),
            seed: config.seed,
        }
    }
}
