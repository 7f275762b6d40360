//! Wall and ball painting

use super::body::{Ball, Wall};
use super::rng::{RandomSource, pick};
use crate::Color;

/// Give every wall in `walls` a random palette color, then match the ball
/// to one of them.
///
/// Returns the ball's new color, or `None` (and changes nothing) when the
/// stack or the palette is empty.
pub fn paint_walls<R: RandomSource + ?Sized>(
    walls: &mut [Wall],
    ball: &mut Ball,
    palette: &[Color],
    rng: &mut R,
) -> Option<Color> {
    if walls.is_empty() || palette.is_empty() {
        return None;
    }

    for wall in walls.iter_mut() {
        if let Some(&color) = pick(rng, palette) {
            wall.color = color;
        }
    }

    let color = pick(rng, walls)?.color;
    ball.color = color;
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_BAR_COLORS;
    use crate::sim::body::Side;
    use crate::sim::layout::build_wall_stack;
    use crate::sim::rng::{ScriptedRandom, SeededRandom};
    use glam::Vec2;

    #[test]
    fn test_scripted_paint() {
        let mut walls = build_wall_stack(Side::Right, 3, 750.0, 900.0);
        let mut ball = Ball::new(Vec2::ZERO, Vec2::ZERO);
        // Three wall colors, then the wall the ball copies
        let mut rng = ScriptedRandom::with_picks(&[1, 4, 0, 2]);

        let color = paint_walls(&mut walls, &mut ball, &DEFAULT_BAR_COLORS, &mut rng);

        assert_eq!(walls[0].color, DEFAULT_BAR_COLORS[1]);
        assert_eq!(walls[1].color, DEFAULT_BAR_COLORS[4]);
        assert_eq!(walls[2].color, DEFAULT_BAR_COLORS[0]);
        assert_eq!(color, Some(DEFAULT_BAR_COLORS[0]));
        assert_eq!(ball.color, DEFAULT_BAR_COLORS[0]);
    }

    #[test]
    fn test_ball_color_from_stack() {
        let mut rng = SeededRandom::new(2024);
        let mut walls = build_wall_stack(Side::Left, 6, 750.0, 1334.0);
        let mut ball = Ball::new(Vec2::ZERO, Vec2::ZERO);
        for _ in 0..100 {
            paint_walls(&mut walls, &mut ball, &DEFAULT_BAR_COLORS, &mut rng);
            assert!(walls.iter().any(|w| w.color == ball.color));
            assert!(walls.iter().all(|w| DEFAULT_BAR_COLORS.contains(&w.color)));
        }
    }

    #[test]
    fn test_empty_inputs_leave_ball_alone() {
        let mut rng = SeededRandom::new(1);
        let mut ball = Ball::new(Vec2::ZERO, Vec2::ZERO);
        ball.color = 0x123456;
        assert_eq!(paint_walls(&mut [], &mut ball, &DEFAULT_BAR_COLORS, &mut rng), None);
        let mut walls = build_wall_stack(Side::Left, 2, 750.0, 1334.0);
        assert_eq!(paint_walls(&mut walls, &mut ball, &[], &mut rng), None);
        assert_eq!(ball.color, 0x123456);
    }
}
