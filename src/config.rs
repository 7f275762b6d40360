//! Game options and variant selection
//!
//! Options are plain data passed into the session; nothing here is global.
//! Overrides come from LocalStorage on the web and a JSON file natively.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Color;
use crate::consts::*;
use crate::platform::storage;

/// Which ruleset is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Walls and coin only, tight vertical bounds
    #[default]
    Classic,
    /// Coins are worth points, spinning coin, looser vertical bounds
    Scoring,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Scoring => "scoring",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "1" => Some(Variant::Classic),
            "scoring" | "score" | "2" => Some(Variant::Scoring),
            _ => None,
        }
    }

    /// How far past the viewport the ball may travel vertically
    pub fn bounds_offset(&self) -> f32 {
        match self {
            Variant::Classic => 0.0,
            Variant::Scoring => SCORING_BOUNDS_OFFSET,
        }
    }

    /// Whether coins award points and a score label is shown
    pub fn tracks_score(&self) -> bool {
        matches!(self, Variant::Scoring)
    }
}

/// Tunable gameplay values, in engine units (pixels per step)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    pub gravity: f32,
    pub ball_speed: f32,
    pub jump_force: f32,
    /// Wall segments per side
    pub bars: usize,
    pub bar_colors: Vec<Color>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            gravity: 4.0,
            ball_speed: 4.0,
            jump_force: 30.0,
            bars: 6,
            bar_colors: DEFAULT_BAR_COLORS.to_vec(),
        }
    }
}

/// Everything a session needs to build a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    pub variant: Variant,
    pub options: GameOptions,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
            variant: Variant::Classic,
            options: GameOptions::default(),
        }
    }
}

/// Rejected configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NoBars,
    EmptyPalette,
    InvalidViewport { width: f32, height: f32 },
    NonPositive { field: &'static str, value: f32 },
    Parse(String),
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBars => write!(f, "bar count must be at least 1"),
            Self::EmptyPalette => write!(f, "bar color palette is empty"),
            Self::InvalidViewport { width, height } => {
                write!(f, "invalid viewport {width}x{height}")
            }
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Io(msg) => write!(f, "config read error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl GameConfig {
    pub fn with_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Check the invariants the scene builder relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(ConfigError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        let opts = &self.options;
        if opts.bars == 0 {
            return Err(ConfigError::NoBars);
        }
        if opts.bar_colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        for (field, value) in [
            ("ball_speed", opts.ball_speed),
            ("jump_force", opts.jump_force),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if opts.gravity < 0.0 || !opts.gravity.is_finite() {
            return Err(ConfigError::NonPositive {
                field: "gravity",
                value: opts.gravity,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Per-step gravity acceleration in pixels per step squared
    pub fn gravity_per_step(&self) -> f32 {
        self.options.gravity * GRAVITY_SCALE * STEP_MS * STEP_MS
    }

    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "color_walls_config";

    /// Defaults for `variant`, with option overrides from LocalStorage if
    /// present and valid
    pub fn load(variant: Variant) -> Self {
        let Some(json) = storage::read(Self::STORAGE_KEY) else {
            return Self::with_variant(variant);
        };
        match Self::from_json(&json) {
            Ok(mut config) => {
                config.variant = variant;
                log::info!("Loaded config overrides from LocalStorage");
                config
            }
            Err(e) => {
                log::warn!("Ignoring stored config: {}", e);
                Self::with_variant(variant)
            }
        }
    }

    /// Read a JSON config file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}
