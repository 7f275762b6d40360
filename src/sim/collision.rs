//! Collision detection for the ball against walls and the coin
//!
//! The ball is a circle; walls are axis-aligned rectangles; the coin is a
//! circle sensor.

use glam::Vec2;

use super::body::Rect;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the rectangle (if hit)
    pub point: Vec2,
    /// Surface normal pointing from the rectangle toward the ball center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a ball and a rectangle
pub fn ball_rect_collision(ball_pos: Vec2, ball_radius: f32, rect: &Rect) -> CollisionResult {
    if rect.contains(ball_pos) {
        // Center inside the rectangle: push out through the nearest face
        let min = rect.min();
        let max = rect.max();
        let faces = [
            (ball_pos.x - min.x, Vec2::NEG_X),
            (max.x - ball_pos.x, Vec2::X),
            (ball_pos.y - min.y, Vec2::NEG_Y),
            (max.y - ball_pos.y, Vec2::Y),
        ];
        let (depth, normal) = faces
            .into_iter()
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or((0.0, Vec2::X));
        return CollisionResult {
            hit: true,
            point: ball_pos + normal * depth,
            normal,
            penetration: depth + ball_radius,
        };
    }

    let closest = rect.clamp_point(ball_pos);
    let offset = ball_pos - closest;
    let dist = offset.length();

    if dist < ball_radius {
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: ball_radius - dist,
        };
    }

    CollisionResult::miss()
}

/// Check overlap between two circles (ball vs sensor)
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    (a - b).length_squared() < reach * reach
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left_wall() -> Rect {
        // x in [0, 40], y in [0, 200]
        Rect::new(Vec2::new(20.0, 100.0), Vec2::new(40.0, 200.0))
    }

    #[test]
    fn test_ball_touching_wall_face() {
        let result = ball_rect_collision(Vec2::new(60.0, 100.0), 25.0, &left_wall());
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 1e-5);
        assert!((result.penetration - 5.0).abs() < 1e-4);
        assert!((result.point - Vec2::new(40.0, 100.0)).length() < 1e-4);
    }

    #[test]
    fn test_ball_clear_of_wall() {
        let result = ball_rect_collision(Vec2::new(70.0, 100.0), 25.0, &left_wall());
        assert!(!result.hit);
    }

    #[test]
    fn test_ball_center_inside_wall() {
        let result = ball_rect_collision(Vec2::new(35.0, 100.0), 25.0, &left_wall());
        assert!(result.hit);
        // Nearest face is the right face at x = 40
        assert!((result.normal - Vec2::X).length() < 1e-5);
        assert!((result.penetration - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_corner_contact_normal() {
        let result = ball_rect_collision(Vec2::new(50.0, 210.0), 25.0, &left_wall());
        assert!(result.hit);
        assert!(result.normal.x > 0.0 && result.normal.y > 0.0);
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 25.0, Vec2::new(49.0, 0.0), 25.0));
        assert!(!circles_overlap(Vec2::ZERO, 25.0, Vec2::new(51.0, 0.0), 25.0));
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving left hits a left wall (normal pointing right)
        let reflected = reflect_velocity(Vec2::new(-4.0, 2.0), Vec2::X);
        assert!((reflected.x - 4.0).abs() < 1e-5);
        assert!((reflected.y - 2.0).abs() < 1e-5);
    }
}
