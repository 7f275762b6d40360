//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (left walls, right walls, coin)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod layout;
pub mod paint;
pub mod rng;
pub mod session;
pub mod state;
pub mod tick;
pub mod world;

pub use body::{Ball, BodyLabel, BodyRef, Coin, Contact, Rect, Side, Wall};
pub use collision::{CollisionResult, ball_rect_collision};
pub use layout::{build_wall_stack, random_coin_position, slot_height, wall_center};
pub use paint::paint_walls;
pub use rng::{RandomSource, SeededRandom};
pub use session::{SceneHooks, SceneStatus, Session, TickInput};
pub use state::{EpisodeStats, GameEvent, GamePhase, RestartReason, Scene};
pub use tick::{Simulation, run_frame};
pub use world::World;
