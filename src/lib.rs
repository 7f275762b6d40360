//! Color Walls - a bouncing ball between colored walls
//!
//! Core modules:
//! - `sim`: Deterministic simulation (walls, ball, coin, color matching)
//! - `config`: Game options and variant selection
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser canvas fitting and query parsing
//! - `headless`: Seeded runs without a browser

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod headless;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, GameConfig, GameOptions, Variant};
pub use highscores::HighScores;
pub use settings::Settings;

/// Packed 0xRRGGBB color
pub type Color = u32;

/// Game configuration constants
pub mod consts {
    use super::Color;

    /// Fixed simulation timestep (60 Hz, one engine step per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Milliseconds per simulation step
    pub const STEP_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical viewport
    pub const VIEWPORT_WIDTH: f32 = 750.0;
    pub const VIEWPORT_HEIGHT: f32 = 1334.0;

    /// Gravity is given in engine units and scaled by this per step
    pub const GRAVITY_SCALE: f32 = 0.001;
    /// Fraction of velocity lost per step to air drag
    pub const AIR_FRICTION: f32 = 0.01;

    /// Width of a wall segment (wall image width)
    pub const WALL_WIDTH: f32 = 40.0;
    pub const BALL_RADIUS: f32 = 25.0;
    /// Coin sprite frames are 50x50
    pub const COIN_RADIUS: f32 = 25.0;

    /// Coin band as a fraction of the viewport
    pub const COIN_BAND_MIN: f32 = 0.2;
    pub const COIN_BAND_MAX: f32 = 0.8;

    /// Points per coin (scoring variant)
    pub const COIN_POINTS: u64 = 10;
    /// Vertical slack past the viewport before a restart (scoring variant)
    pub const SCORING_BOUNDS_OFFSET: f32 = 50.0;

    /// Coin spin animation
    pub const COIN_SPIN_FRAMES: u32 = 6;
    pub const COIN_SPIN_TICKS_PER_FRAME: u32 = 4;

    pub const BACKGROUND_COLOR: Color = 0x181818;

    /// Default wall palette
    pub const DEFAULT_BAR_COLORS: [Color; 6] =
        [0x2B98D1, 0x43D451, 0xFFF8F0, 0xF82991, 0xF79702, 0xFCD201];
}

/// Split a packed color into normalized RGBA
#[inline]
pub fn color_to_rgba(color: Color, alpha: f32) -> [f32; 4] {
    let r = ((color >> 16) & 0xFF) as f32 / 255.0;
    let g = ((color >> 8) & 0xFF) as f32 / 255.0;
    let b = (color & 0xFF) as f32 / 255.0;
    [r, g, b, alpha]
}
