//! Game session: the scene callbacks the host drives each frame
//!
//! The host calls, in order: `handle_input`, its physics step,
//! `handle_collision` for every contact that began, then `tick`. A `tick`
//! returning `SceneStatus::Restart` means the host resets its world and
//! calls `initialize` again.

use super::body::{BodyLabel, Contact, Side};
use super::rng::{RandomSource, SeededRandom};
use super::state::{EpisodeStats, GameEvent, GamePhase, RestartReason, Scene};
use crate::Color;
use crate::config::{ConfigError, GameConfig};
use crate::consts::COIN_POINTS;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer down / tap
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneStatus {
    Running,
    Restart(RestartReason),
}

/// Callbacks a scene exposes to the host loop
pub trait SceneHooks {
    /// Build (or rebuild) the scene from scratch
    fn initialize(&mut self);
    fn handle_input(&mut self, input: &TickInput);
    fn handle_collision(&mut self, contact: &Contact);
    /// Per-frame update after physics; ends the step's contact handling
    fn tick(&mut self) -> SceneStatus;

    /// Bodies the host steps
    fn scene_mut(&mut self) -> &mut Scene;
    /// While paused the host skips physics and `tick`
    fn is_paused(&self) -> bool;
}

/// One player's run: configuration, random source, the current scene and
/// everything that survives a restart
#[derive(Debug)]
pub struct Session<R: RandomSource = SeededRandom> {
    config: GameConfig,
    rng: R,
    scene: Scene,
    phase: GamePhase,
    /// Never reset on restart
    score: u64,
    /// 1-based episode counter
    episode: u32,
    stats: EpisodeStats,
    pending_restart: Option<RestartReason>,
    /// Ball color when the first wall contact of this step arrived.
    /// Later wall contacts of the same step are judged against it.
    step_color: Option<Color>,
    events: Vec<GameEvent>,
}

impl Session<SeededRandom> {
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, SeededRandom::new(seed))
    }
}

impl<R: RandomSource> Session<R> {
    pub fn new(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut session = Self {
            config,
            rng,
            scene: Scene::default(),
            phase: GamePhase::Running,
            score: 0,
            episode: 0,
            stats: EpisodeStats::default(),
            pending_restart: None,
            step_color: None,
            events: Vec::new(),
        };
        session.initialize();
        Ok(session)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn stats(&self) -> EpisodeStats {
        self.stats
    }

    /// Score label, only in the scoring variant
    pub fn score_text(&self) -> Option<String> {
        self.config
            .variant
            .tracks_score()
            .then(|| format!("Score: {}", self.score))
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Points earned in the current episode
    pub fn episode_points(&self) -> u64 {
        if self.config.variant.tracks_score() {
            self.stats.coins as u64 * COIN_POINTS
        } else {
            0
        }
    }

    fn request_restart(&mut self, reason: RestartReason) {
        if self.pending_restart.is_some() {
            return;
        }
        log::info!(
            "Episode {} over ({:?}) after {} ticks, {} bounces, {} coins",
            self.episode,
            reason,
            self.stats.ticks,
            self.stats.bounces,
            self.stats.coins
        );
        self.pending_restart = Some(reason);
        self.phase = GamePhase::Restarting;
        self.events.push(GameEvent::Restarted {
            reason,
            episode_points: self.episode_points(),
        });
    }

    fn handle_wall_collision(&mut self, side: Side, index: usize) {
        let Some(wall) = self.scene.wall(side, index) else {
            log::warn!("Contact with unknown wall {:?}#{}", side, index);
            return;
        };

        let repainted = self.step_color.is_some();
        let ball_color = *self.step_color.get_or_insert(self.scene.ball.color);

        if wall.color != ball_color {
            self.request_restart(RestartReason::ColorMismatch { side });
            return;
        }
        // Ball straddling a seam: one bounce per step
        if repainted {
            return;
        }

        self.stats.bounces += 1;
        self.events.push(GameEvent::Bounced { side, index });

        let target = side.opposite();
        if let Some(ball_color) =
            self.scene
                .paint(target, &self.config.options.bar_colors, &mut self.rng)
        {
            log::debug!("Repainted {:?} walls, ball now {:06X}", target, ball_color);
            self.events.push(GameEvent::Repainted {
                side: target,
                ball_color,
            });
        }

        let ball = &mut self.scene.ball;
        ball.vel.x = ball.latched_vx(self.config.options.ball_speed);
    }

    fn collect_coin(&mut self) {
        self.scene.place_coin(&self.config, &mut self.rng);
        self.stats.coins += 1;

        if self.config.variant.tracks_score() {
            self.score += COIN_POINTS;
            self.scene.coin.start_spin();
        }
        log::debug!("Coin collected, score {}", self.score);
        self.events.push(GameEvent::CoinCollected { score: self.score });
    }

    fn out_of_bounds(&self) -> bool {
        let offset = self.config.variant.bounds_offset();
        let y = self.scene.ball.pos.y;
        y < -offset || y > self.config.height + offset
    }
}

impl<R: RandomSource> SceneHooks for Session<R> {
    fn initialize(&mut self) {
        self.scene = Scene::build(&self.config, &mut self.rng);
        self.phase = GamePhase::Running;
        self.pending_restart = None;
        self.step_color = None;
        self.stats = EpisodeStats::default();
        self.episode += 1;
        log::info!(
            "Episode {} started ({} variant)",
            self.episode,
            self.config.variant.as_str()
        );
    }

    fn handle_input(&mut self, input: &TickInput) {
        if input.pause {
            match self.phase {
                GamePhase::Running => {
                    self.phase = GamePhase::Paused;
                    self.events.push(GameEvent::Paused);
                    return;
                }
                GamePhase::Paused => {
                    self.phase = GamePhase::Running;
                    self.events.push(GameEvent::Resumed);
                }
                GamePhase::Restarting => {}
            }
        }

        if self.phase != GamePhase::Running || !input.jump {
            return;
        }

        let speed = self.config.options.ball_speed;
        let ball = &mut self.scene.ball;
        ball.vel.x = ball.latched_vx(speed);
        ball.vel.y = -self.config.options.jump_force;
        self.events.push(GameEvent::Jumped);
    }

    fn handle_collision(&mut self, contact: &Contact) {
        // Scene is being torn down; later contacts of this frame are moot
        if self.pending_restart.is_some() {
            return;
        }

        for side in [Side::Left, Side::Right] {
            if contact.involves(side.label()) {
                if let Some(index) = contact.wall_on(side) {
                    self.handle_wall_collision(side, index);
                }
                if self.pending_restart.is_some() {
                    return;
                }
            }
        }

        if contact.involves(BodyLabel::Coin) {
            self.collect_coin();
        }
    }

    fn tick(&mut self) -> SceneStatus {
        self.step_color = None;
        if let Some(reason) = self.pending_restart {
            return SceneStatus::Restart(reason);
        }
        if self.phase == GamePhase::Paused {
            return SceneStatus::Running;
        }

        self.stats.ticks += 1;

        let speed = self.config.options.ball_speed;
        let ball = &mut self.scene.ball;
        ball.vel.x = ball.latched_vx(speed);
        self.scene.coin.advance_spin();

        if self.out_of_bounds() {
            self.request_restart(RestartReason::OutOfBounds);
            return SceneStatus::Restart(RestartReason::OutOfBounds);
        }

        SceneStatus::Running
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::consts::DEFAULT_BAR_COLORS;
    use crate::sim::body::BodyRef;
    use crate::sim::rng::ScriptedRandom;
    use glam::Vec2;

    fn scoring_session(seed: u64) -> Session {
        Session::with_seed(GameConfig::with_variant(Variant::Scoring), seed).expect("valid")
    }

    fn wall_contact(side: Side, index: usize) -> Contact {
        Contact::new(BodyRef::Ball, BodyRef::Wall { side, index })
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.options.bars = 0;
        assert!(matches!(
            Session::with_seed(config, 1),
            Err(ConfigError::NoBars)
        ));
    }

    #[test]
    fn test_bounds_scoring_variant() {
        let mut session = scoring_session(1);
        session.scene_mut().ball.pos.y = -49.0;
        assert_eq!(session.tick(), SceneStatus::Running);

        session.scene_mut().ball.pos.y = -51.0;
        assert_eq!(
            session.tick(),
            SceneStatus::Restart(RestartReason::OutOfBounds)
        );
        assert_eq!(session.phase(), GamePhase::Restarting);
    }

    #[test]
    fn test_bounds_classic_variant() {
        let mut session = Session::with_seed(GameConfig::default(), 1).expect("valid");
        session.scene_mut().ball.pos.y = 0.0;
        assert_eq!(session.tick(), SceneStatus::Running);
        session.scene_mut().ball.pos.y = 1334.0;
        assert_eq!(session.tick(), SceneStatus::Running);
        session.scene_mut().ball.pos.y = 1334.5;
        assert!(matches!(session.tick(), SceneStatus::Restart(_)));
    }

    #[test]
    fn test_classic_restart_above_top() {
        let mut session = Session::with_seed(GameConfig::default(), 2).expect("valid");
        session.scene_mut().ball.pos.y = -0.5;
        assert_eq!(
            session.tick(),
            SceneStatus::Restart(RestartReason::OutOfBounds)
        );
    }

    #[test]
    fn test_seam_contacts_judged_on_step_color() {
        let mut session = scoring_session(6);
        for index in [2, 3] {
            session.scene_mut().left_walls[index].color = 0x123456;
        }
        session.scene_mut().ball.color = 0x123456;

        session.handle_collision(&wall_contact(Side::Left, 2));
        session.handle_collision(&wall_contact(Side::Left, 3));

        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.stats().bounces, 1);
        let bounces = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Bounced { .. }))
            .count();
        assert_eq!(bounces, 1);
        assert_eq!(session.tick(), SceneStatus::Running);

        // Next step starts from the repainted ball color
        let color = session.scene().ball.color;
        assert!(session.scene().right_walls.iter().any(|w| w.color == color));
    }

    #[test]
    fn test_seam_with_wrong_neighbor_restarts() {
        let mut session = scoring_session(6);
        session.scene_mut().left_walls[2].color = 0x123456;
        session.scene_mut().left_walls[3].color = 0x654321;
        session.scene_mut().ball.color = 0x123456;

        session.handle_collision(&wall_contact(Side::Left, 2));
        session.handle_collision(&wall_contact(Side::Left, 3));

        assert_eq!(
            session.tick(),
            SceneStatus::Restart(RestartReason::ColorMismatch { side: Side::Left })
        );
    }

    #[test]
    fn test_mismatch_restarts_and_keeps_score() {
        let mut session = scoring_session(9);
        session.handle_collision(&Contact::new(BodyRef::Coin, BodyRef::Ball));
        assert_eq!(session.score(), 10);

        // Force a mismatch on left wall 0
        let wall_color = session.scene().left_walls[0].color;
        session.scene_mut().ball.color = wall_color ^ 0x010101;
        session.handle_collision(&wall_contact(Side::Left, 0));

        let status = session.tick();
        assert_eq!(
            status,
            SceneStatus::Restart(RestartReason::ColorMismatch { side: Side::Left })
        );
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::Restarted {
            reason: RestartReason::ColorMismatch { side: Side::Left },
            episode_points: 10,
        }));

        session.initialize();
        assert_eq!(session.episode(), 2);
        assert_eq!(session.score(), 10);
        assert_eq!(session.stats(), EpisodeStats::default());
        assert_eq!(session.score_text().as_deref(), Some("Score: 10"));
    }

    #[test]
    fn test_contacts_ignored_after_restart_request() {
        let mut session = scoring_session(4);
        let wall_color = session.scene().left_walls[1].color;
        session.scene_mut().ball.color = wall_color ^ 0x010101;
        session.handle_collision(&wall_contact(Side::Left, 1));
        session.handle_collision(&Contact::new(BodyRef::Ball, BodyRef::Coin));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_coin_scores_and_relocates() {
        let mut session = scoring_session(5);
        let before = session.scene().coin.pos;
        let mut moved = false;
        for n in 1..=5u64 {
            session.handle_collision(&Contact::new(BodyRef::Coin, BodyRef::Ball));
            assert_eq!(session.score(), n * 10);
            assert_eq!(session.score_text(), Some(format!("Score: {}", n * 10)));
            let pos = session.scene().coin.pos;
            assert!(pos.x >= 150.0 && pos.x <= 600.0);
            assert!(pos.y >= 0.2 * 1334.0 && pos.y <= 0.8 * 1334.0);
            moved |= pos != before;
        }
        assert!(moved);
        assert!(session.scene().coin.spin_ticks > 0);
    }

    #[test]
    fn test_classic_coin_has_no_score() {
        let mut session = Session::with_seed(GameConfig::default(), 5).expect("valid");
        session.handle_collision(&Contact::new(BodyRef::Coin, BodyRef::Ball));
        assert_eq!(session.score(), 0);
        assert_eq!(session.score_text(), None);
        assert_eq!(session.stats().coins, 1);
        assert_eq!(session.scene().coin.spin_ticks, 0);
    }

    #[test]
    fn test_matching_left_wall_repaints_right() {
        // Build: 6 left colors + ball pick, then 6 right colors + ball pick.
        // Coin placement draws from `between`, not from these picks.
        let mut picks = vec![0, 0, 0, 0, 0, 0, 0];
        picks.extend([1, 1, 1, 1, 1, 1, 0]);
        // Repaint of the right stack after the bounce
        picks.extend([3, 4, 5, 3, 4, 5, 2]);
        let rng = ScriptedRandom::with_picks(&picks);
        let mut session = Session::new(GameConfig::default(), rng).expect("valid");

        let left_before: Vec<_> = session.scene().left_walls.iter().map(|w| w.color).collect();
        assert!(left_before.iter().all(|&c| c == DEFAULT_BAR_COLORS[0]));
        assert_eq!(session.scene().ball.color, DEFAULT_BAR_COLORS[1]);

        // Already reflected off matching left wall 2
        session.scene_mut().ball.color = DEFAULT_BAR_COLORS[0];
        session.scene_mut().ball.vel = Vec2::new(3.1, -2.0);
        session.handle_collision(&wall_contact(Side::Left, 2));

        let left_after: Vec<_> = session.scene().left_walls.iter().map(|w| w.color).collect();
        assert_eq!(left_before, left_after);

        let right: Vec<_> = session.scene().right_walls.iter().map(|w| w.color).collect();
        let expected: Vec<_> = [3, 4, 5, 3, 4, 5]
            .iter()
            .map(|&i| DEFAULT_BAR_COLORS[i])
            .collect();
        assert_eq!(right, expected);
        assert_eq!(session.scene().ball.color, DEFAULT_BAR_COLORS[5]);
        assert!(right.contains(&session.scene().ball.color));
        assert_eq!(session.scene().ball.vel, Vec2::new(4.0, -2.0));
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.stats().bounces, 1);
    }

    #[test]
    fn test_matching_right_wall_repaints_left() {
        // Build: 6 left colors + ball pick, then 6 right colors + ball pick
        let mut picks = vec![0, 0, 0, 0, 0, 0, 0];
        picks.extend([1, 1, 1, 1, 1, 1, 0]);
        // Repaint of the left stack after the bounce
        picks.extend([2, 3, 4, 2, 3, 4, 1]);
        let rng = ScriptedRandom::with_picks(&picks);
        let mut session = Session::new(GameConfig::default(), rng).expect("valid");
        assert_eq!(session.scene().ball.color, DEFAULT_BAR_COLORS[1]);

        let right_before: Vec<_> = session.scene().right_walls.iter().map(|w| w.color).collect();

        // Already reflected off matching right wall 4
        session.scene_mut().ball.vel = Vec2::new(-3.1, 2.0);
        session.handle_collision(&wall_contact(Side::Right, 4));

        let right_after: Vec<_> = session.scene().right_walls.iter().map(|w| w.color).collect();
        assert_eq!(right_before, right_after);

        let left: Vec<_> = session.scene().left_walls.iter().map(|w| w.color).collect();
        let expected: Vec<_> = [2, 3, 4, 2, 3, 4]
            .iter()
            .map(|&i| DEFAULT_BAR_COLORS[i])
            .collect();
        assert_eq!(left, expected);
        assert_eq!(session.scene().ball.color, DEFAULT_BAR_COLORS[3]);
        assert_eq!(session.scene().ball.vel, Vec2::new(-4.0, 2.0));
        assert_eq!(session.phase(), GamePhase::Running);
        assert!(session.drain_events().contains(&GameEvent::Repainted {
            side: Side::Left,
            ball_color: DEFAULT_BAR_COLORS[3],
        }));
    }

    #[test]
    fn test_jump_keeps_direction() {
        let mut session = Session::with_seed(GameConfig::default(), 8).expect("valid");
        session.scene_mut().ball.vel = Vec2::new(-0.5, 12.0);
        session.handle_input(&TickInput {
            jump: true,
            ..Default::default()
        });
        assert_eq!(session.scene().ball.vel, Vec2::new(-4.0, -30.0));
        assert_eq!(session.drain_events(), vec![GameEvent::Jumped]);
    }

    #[test]
    fn test_pause_blocks_jump() {
        let mut session = Session::with_seed(GameConfig::default(), 8).expect("valid");
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        session.handle_input(&pause);
        assert!(session.is_paused());

        let vel = session.scene().ball.vel;
        session.handle_input(&TickInput {
            jump: true,
            ..Default::default()
        });
        assert_eq!(session.scene().ball.vel, vel);

        session.handle_input(&pause);
        assert!(!session.is_paused());
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::Paused, GameEvent::Resumed]
        );
    }
}
