//! Shape generation for 2D primitives
//!
//! Everything is built in viewport coordinates (pixels, y down); the render
//! state maps to clip space on upload.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::color_to_rgba;
use crate::consts::COIN_SPIN_FRAMES;
use crate::sim::{Coin, Rect, Scene};

/// Circle tessellation
const CIRCLE_SEGMENTS: u32 = 32;

/// Generate vertices for a filled rectangle
pub fn rect(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let min = r.min();
    let max = r.max();
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a filled ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Horizontal squash of the coin for its current spin frame
pub fn coin_width_scale(coin: &Coin) -> f32 {
    if coin.spin_ticks == 0 {
        return 1.0;
    }
    // One full turn over the animation
    let turn = coin.spin_frame() as f32 / COIN_SPIN_FRAMES as f32;
    (turn * 2.0 * PI).cos().abs().max(0.1)
}

/// All triangles for one frame of the scene
pub fn scene_vertices(scene: &Scene) -> Vec<Vertex> {
    let wall_count = scene.left_walls.len() + scene.right_walls.len();
    let mut vertices = Vec::with_capacity(wall_count * 12 + CIRCLE_SEGMENTS as usize * 9);

    for wall in scene.left_walls.iter().chain(&scene.right_walls) {
        vertices.extend(rect(&wall.rect, color_to_rgba(wall.color, 1.0)));
        if wall.index > 0 {
            let seam = Rect::new(
                Vec2::new(wall.rect.center.x, wall.rect.min().y),
                Vec2::new(wall.rect.half_extents.x * 2.0, 2.0),
            );
            vertices.extend(rect(&seam, colors::WALL_SEAM));
        }
    }

    let coin = &scene.coin;
    let squash = coin_width_scale(coin);
    vertices.extend(ellipse(
        coin.pos,
        Vec2::new(coin.radius * squash, coin.radius),
        colors::COIN_EDGE,
        CIRCLE_SEGMENTS,
    ));
    vertices.extend(ellipse(
        coin.pos,
        Vec2::new(coin.radius * 0.75 * squash, coin.radius * 0.75),
        colors::COIN,
        CIRCLE_SEGMENTS,
    ));

    let ball = &scene.ball;
    vertices.extend(circle(
        ball.pos,
        ball.radius,
        color_to_rgba(ball.color, 1.0),
        CIRCLE_SEGMENTS,
    ));

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::SeededRandom;

    #[test]
    fn test_rect_covers_bounds() {
        let r = Rect::new(Vec2::new(20.0, 100.0), Vec2::new(40.0, 200.0));
        let v = rect(&r, [1.0; 4]);
        assert_eq!(v.len(), 6);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 0.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 0.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 200.0);
    }

    #[test]
    fn test_scene_vertices_use_wall_colors() {
        let config = GameConfig::default();
        let scene = Scene::build(&config, &mut SeededRandom::new(5));
        let vertices = scene_vertices(&scene);
        assert_eq!(vertices.len() % 3, 0);
        let first_wall = color_to_rgba(scene.left_walls[0].color, 1.0);
        assert_eq!(vertices[0].color, first_wall);
        let ball_color = color_to_rgba(scene.ball.color, 1.0);
        assert_eq!(vertices.last().map(|v| v.color), Some(ball_color));
    }

    #[test]
    fn test_coin_squash() {
        let mut coin = Coin::default();
        assert_eq!(coin_width_scale(&coin), 1.0);
        coin.start_spin();
        for _ in 0..(crate::consts::COIN_SPIN_TICKS_PER_FRAME * COIN_SPIN_FRAMES / 4) {
            coin.advance_spin();
        }
        assert!(coin_width_scale(&coin) < 1.0);
    }
}
