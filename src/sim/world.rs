//! Host world stepper
//!
//! The smallest physics step the game needs: gravity and drag on the ball,
//! push-out and reflection against walls, and begin-contact events.
//! Units are pixels per step at a fixed 60 Hz.

use std::collections::BTreeSet;

use super::body::{BodyRef, Contact};
use super::collision::{ball_rect_collision, circles_overlap, reflect_velocity};
use super::state::Scene;
use crate::consts::AIR_FRICTION;

/// Tracks which bodies the ball is touching so contacts fire once
#[derive(Debug, Clone, Default)]
pub struct World {
    /// Gravity in pixels per step squared
    gravity: f32,
    touching: BTreeSet<BodyRef>,
}

impl World {
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity,
            touching: BTreeSet::new(),
        }
    }

    /// Forget all contacts (the scene was rebuilt)
    pub fn reset(&mut self) {
        self.touching.clear();
    }

    /// Bodies currently overlapping the ball
    pub fn touching(&self) -> impl Iterator<Item = &BodyRef> {
        self.touching.iter()
    }

    /// Advance the scene one step and return the contacts that began
    pub fn step(&mut self, scene: &mut Scene) -> Vec<Contact> {
        let ball = &mut scene.ball;

        ball.vel.y += self.gravity;
        ball.vel.y *= 1.0 - AIR_FRICTION;
        ball.pos += ball.vel;

        let mut now_touching = BTreeSet::new();

        for wall in scene.left_walls.iter().chain(&scene.right_walls) {
            let result = ball_rect_collision(ball.pos, ball.radius, &wall.rect);
            if !result.hit {
                continue;
            }
            ball.pos += result.normal * result.penetration;
            if ball.vel.dot(result.normal) < 0.0 {
                ball.vel = reflect_velocity(ball.vel, result.normal);
            }
            now_touching.insert(wall.body_ref());
        }

        // Sensor: reports overlap, never moves the ball
        if circles_overlap(ball.pos, ball.radius, scene.coin.pos, scene.coin.radius) {
            now_touching.insert(BodyRef::Coin);
        }

        let contacts = now_touching
            .iter()
            .filter(|body| !self.touching.contains(body))
            .map(|&body| Contact::new(BodyRef::Ball, body))
            .collect();

        self.touching = now_touching;
        contacts
    }
}
