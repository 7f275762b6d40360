//! Wall grid and coin placement
//!
//! Pure arithmetic: the stacks tile the viewport height, the coin lands in
//! the middle 60% of the viewport.

use glam::Vec2;

use super::body::{Rect, Side, Wall};
use super::rng::RandomSource;
use crate::consts::*;

/// Height of one wall slot
#[inline]
pub fn slot_height(height: f32, bars: usize) -> f32 {
    height / bars as f32
}

/// Center of wall `index` on `side`.
///
/// Left walls sit flush against x = 0 and right walls against x = width.
pub fn wall_center(index: usize, side: Side, bars: usize, width: f32, height: f32) -> Vec2 {
    let slot = slot_height(height, bars);
    let s = side.multiplier();
    let x = s * width + WALL_WIDTH / 2.0 - WALL_WIDTH * s;
    let y = slot * index as f32 + slot / 2.0;
    Vec2::new(x, y)
}

/// Build one side's stack of `bars` walls, uncolored
pub fn build_wall_stack(side: Side, bars: usize, width: f32, height: f32) -> Vec<Wall> {
    let slot = slot_height(height, bars);
    (0..bars)
        .map(|index| Wall {
            side,
            index,
            rect: Rect::new(
                wall_center(index, side, bars, width, height),
                Vec2::new(WALL_WIDTH, slot),
            ),
            color: 0xFFFFFF,
        })
        .collect()
}

/// Inclusive integer range covering `[lo, hi]` of the given extent
fn band(extent: f32) -> (i32, i32) {
    let lo = (extent * COIN_BAND_MIN).ceil() as i32;
    let hi = (extent * COIN_BAND_MAX).floor() as i32;
    (lo, hi.max(lo))
}

/// Random coin position within the 20%-80% band of the viewport
pub fn random_coin_position<R: RandomSource + ?Sized>(rng: &mut R, width: f32, height: f32) -> Vec2 {
    let (x_lo, x_hi) = band(width);
    let (y_lo, y_hi) = band(height);
    let x = rng.between(x_lo, x_hi);
    let y = rng.between(y_lo, y_hi);
    Vec2::new(x as f32, y as f32)
}
