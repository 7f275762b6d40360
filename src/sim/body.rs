//! Body shapes and labels
//!
//! Walls are axis-aligned rectangles in viewport space (y grows downward).
//! Labels route contacts to the right handler.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Color;
use crate::consts::*;

/// Which wall stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// 0 for left, 1 for right; mirrors the x layout
    pub fn multiplier(self) -> f32 {
        match self {
            Side::Left => 0.0,
            Side::Right => 1.0,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn label(self) -> BodyLabel {
        match self {
            Side::Left => BodyLabel::LeftWall,
            Side::Right => BodyLabel::RightWall,
        }
    }
}

/// Tag carried by every body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyLabel {
    Ball,
    LeftWall,
    RightWall,
    Coin,
}

impl BodyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyLabel::Ball => "ball",
            BodyLabel::LeftWall => "leftwall",
            BodyLabel::RightWall => "rightwall",
            BodyLabel::Coin => "coin",
        }
    }
}

/// Handle to a body in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodyRef {
    Ball,
    Wall { side: Side, index: usize },
    Coin,
}

impl BodyRef {
    pub fn label(&self) -> BodyLabel {
        match self {
            BodyRef::Ball => BodyLabel::Ball,
            BodyRef::Wall { side, .. } => side.label(),
            BodyRef::Coin => BodyLabel::Coin,
        }
    }
}

/// A contact that started this step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub body_a: BodyRef,
    pub body_b: BodyRef,
}

impl Contact {
    pub fn new(body_a: BodyRef, body_b: BodyRef) -> Self {
        Self { body_a, body_b }
    }

    pub fn involves(&self, label: BodyLabel) -> bool {
        self.body_a.label() == label || self.body_b.label() == label
    }

    /// The wall on the given side taking part in this contact, if any
    pub fn wall_on(&self, side: Side) -> Option<usize> {
        [self.body_a, self.body_b].into_iter().find_map(|b| match b {
            BodyRef::Wall { side: s, index } if s == side => Some(index),
            _ => None,
        })
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size / 2.0,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Closest point inside the rectangle
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }
}

/// A static wall segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub side: Side,
    pub index: usize,
    pub rect: Rect,
    pub color: Color,
}

impl Wall {
    pub fn body_ref(&self) -> BodyRef {
        BodyRef::Wall {
            side: self.side,
            index: self.index,
        }
    }
}

/// The player's ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per step
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            color: 0xFFFFFF,
        }
    }

    /// Horizontal speed with the current direction kept.
    /// Anything not strictly moving right counts as moving left.
    pub fn latched_vx(&self, speed: f32) -> f32 {
        if self.vel.x > 0.0 { speed } else { -speed }
    }
}

impl Default for Ball {
    fn default() -> Self {
        Ball::new(Vec2::ZERO, Vec2::ZERO)
    }
}

/// The collectible; a sensor that never blocks the ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub radius: f32,
    /// Remaining spin animation ticks (0 = idle)
    #[serde(default)]
    pub spin_ticks: u32,
}

impl Default for Coin {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            radius: COIN_RADIUS,
            spin_ticks: 0,
        }
    }
}

impl Coin {
    pub fn start_spin(&mut self) {
        self.spin_ticks = COIN_SPIN_FRAMES * COIN_SPIN_TICKS_PER_FRAME;
    }

    pub fn advance_spin(&mut self) {
        self.spin_ticks = self.spin_ticks.saturating_sub(1);
    }

    /// Current sprite frame of the spin (0 when idle)
    pub fn spin_frame(&self) -> u32 {
        if self.spin_ticks == 0 {
            return 0;
        }
        let total = COIN_SPIN_FRAMES * COIN_SPIN_TICKS_PER_FRAME;
        (total - self.spin_ticks) / COIN_SPIN_TICKS_PER_FRAME
    }
}
