//! Seeded runs without a browser
//!
//! Taps on a fixed cadence and tallies what happened. Used by the native
//! binary and handy for checking that a config change still plays.

use serde::Serialize;

use crate::config::{ConfigError, GameConfig};
use crate::sim::{GameEvent, RestartReason, SceneStatus, Simulation, TickInput};

/// Scripted run parameters
#[derive(Debug, Clone)]
pub struct HeadlessRun {
    pub seed: u64,
    pub frames: u32,
    /// Tap every N frames (0 = never)
    pub tap_every: u32,
}

/// What happened over a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub variant: String,
    pub frames: u64,
    pub episodes: u32,
    pub jumps: u32,
    pub bounces: u32,
    pub coins: u32,
    pub mismatch_restarts: u32,
    pub out_of_bounds_restarts: u32,
    pub final_score: u64,
    /// Longest episode in frames
    pub longest_episode: u64,
}

impl RunSummary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Jumped => self.jumps += 1,
            GameEvent::Bounced { .. } => self.bounces += 1,
            GameEvent::CoinCollected { .. } => self.coins += 1,
            GameEvent::Restarted { reason, .. } => match reason {
                RestartReason::ColorMismatch { .. } => self.mismatch_restarts += 1,
                RestartReason::OutOfBounds => self.out_of_bounds_restarts += 1,
            },
            GameEvent::Repainted { .. } | GameEvent::Paused | GameEvent::Resumed => {}
        }
    }
}

/// Play `run.frames` frames and summarize
pub fn run_headless(config: GameConfig, run: &HeadlessRun) -> Result<RunSummary, ConfigError> {
    let mut summary = RunSummary {
        seed: run.seed,
        variant: config.variant.as_str().to_string(),
        ..Default::default()
    };
    let mut sim = Simulation::new(config, run.seed)?;
    let mut episode_start = 0u64;

    for frame in 0..run.frames {
        let input = TickInput {
            jump: run.tap_every > 0 && frame % run.tap_every == 0,
            ..Default::default()
        };
        let status = sim.advance(&input);

        for event in sim.session.drain_events() {
            log::debug!("frame {}: {:?}", frame, event);
            summary.record(&event);
        }

        if let SceneStatus::Restart(_) = status {
            summary.longest_episode = summary.longest_episode.max(sim.frames() - episode_start);
            episode_start = sim.frames();
        }
    }

    summary.frames = sim.frames();
    summary.episodes = sim.session.episode();
    summary.final_score = sim.session.score();
    summary.longest_episode = summary.longest_episode.max(sim.frames() - episode_start);
    Ok(summary)
}
