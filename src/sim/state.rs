//! Scene and session state types
//!
//! A `Scene` is everything rebuilt on restart. The score and episode count
//! live on the session and outlive it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Ball, Coin, Side, Wall};
use super::layout::{build_wall_stack, random_coin_position};
use super::paint::paint_walls;
use super::rng::RandomSource;
use crate::Color;
use crate::config::GameConfig;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Frozen by the player or by losing focus
    Paused,
    /// Episode over, scene will be rebuilt
    Restarting,
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartReason {
    /// Ball struck a wall of a different color
    ColorMismatch { side: Side },
    /// Ball left the vertical bounds
    OutOfBounds,
}

/// Things that happened during a frame, for sound, HUD and logs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    /// Ball struck a wall of its own color
    Bounced { side: Side, index: usize },
    /// A stack was repainted and the ball took one of its colors
    Repainted { side: Side, ball_color: Color },
    /// Coin touched; `score` is the running total (0 when not scoring)
    CoinCollected { score: u64 },
    Restarted {
        reason: RestartReason,
        /// Points earned in the episode that just ended
        episode_points: u64,
    },
    Paused,
    Resumed,
}

/// Per-episode counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub bounces: u32,
    pub coins: u32,
    pub ticks: u64,
}

/// All bodies of one episode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    pub left_walls: Vec<Wall>,
    pub right_walls: Vec<Wall>,
    pub ball: Ball,
    pub coin: Coin,
}

impl Scene {
    /// Build a fresh scene: walls, ball, coin, then paint left and right
    pub fn build<R: RandomSource + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let opts = &config.options;
        let mut scene = Self {
            left_walls: build_wall_stack(Side::Left, opts.bars, config.width, config.height),
            right_walls: build_wall_stack(Side::Right, opts.bars, config.width, config.height),
            ball: Ball::new(
                Vec2::new(config.width / 4.0, config.height / 2.0),
                Vec2::new(opts.ball_speed, 0.0),
            ),
            coin: Coin::default(),
        };

        scene.place_coin(config, rng);
        scene.paint(Side::Left, &opts.bar_colors, rng);
        scene.paint(Side::Right, &opts.bar_colors, rng);
        scene
    }

    pub fn walls(&self, side: Side) -> &[Wall] {
        match side {
            Side::Left => &self.left_walls,
            Side::Right => &self.right_walls,
        }
    }

    pub fn wall(&self, side: Side, index: usize) -> Option<&Wall> {
        self.walls(side).get(index)
    }

    /// Repaint one stack and sync the ball to it
    pub fn paint<R: RandomSource + ?Sized>(
        &mut self,
        side: Side,
        palette: &[Color],
        rng: &mut R,
    ) -> Option<Color> {
        let walls = match side {
            Side::Left => &mut self.left_walls,
            Side::Right => &mut self.right_walls,
        };
        paint_walls(walls, &mut self.ball, palette, rng)
    }

    /// Move the coin to a new random spot
    pub fn place_coin<R: RandomSource + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        self.coin.pos = random_coin_position(rng, config.width, config.height);
    }
}
