//! Audio system using Web Audio API
//!
//! Short oscillator blips, no asset files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball bounced off a matching wall
    WallBounce,
    /// Player tap
    Jump,
    /// Coin picked up
    CoinCollect,
    /// Color mismatch or ball left the screen
    Restart,
    /// Finished episode made the leaderboard
    HighScore,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pick up volume and mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::WallBounce => self.play_wall_bounce(ctx, vol),
            SoundEffect::Jump => self.play_jump(ctx, vol),
            SoundEffect::CoinCollect => self.play_coin(ctx, vol),
            SoundEffect::Restart => self.play_restart(ctx, vol),
            SoundEffect::HighScore => self.play_high_score(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single decaying tone starting at `at` seconds from now
    fn blip(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        peak: f32,
        at: f64,
        length: f64,
    ) -> Option<OscillatorNode> {
        let (osc, gain) = self.create_osc(ctx, freq, osc_type)?;
        let t = ctx.current_time() + at;

        gain.gain().set_value_at_time(peak, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + length)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + length + 0.02).ok();
        Some(osc)
    }

    /// Wall bounce - short ping
    fn play_wall_bounce(&self, ctx: &AudioContext, vol: f32) {
        self.blip(ctx, 520.0, OscillatorType::Sine, vol * 0.3, 0.0, 0.08);
    }

    /// Jump - rising chirp
    fn play_jump(&self, ctx: &AudioContext, vol: f32) {
        let Some(osc) = self.blip(ctx, 220.0, OscillatorType::Triangle, vol * 0.35, 0.0, 0.12)
        else {
            return;
        };
        let t = ctx.current_time();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(440.0, t + 0.1)
            .ok();
    }

    /// Coin - two bright notes
    fn play_coin(&self, ctx: &AudioContext, vol: f32) {
        self.blip(ctx, 988.0, OscillatorType::Square, vol * 0.15, 0.0, 0.06);
        self.blip(ctx, 1319.0, OscillatorType::Square, vol * 0.15, 0.06, 0.2);
    }

    /// Restart - falling buzz
    fn play_restart(&self, ctx: &AudioContext, vol: f32) {
        let Some(osc) = self.blip(ctx, 300.0, OscillatorType::Sawtooth, vol * 0.25, 0.0, 0.35)
        else {
            return;
        };
        let t = ctx.current_time();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.35)
            .ok();
    }

    /// High score - arpeggio
    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        let notes = [523.0, 659.0, 784.0, 1047.0];
        for (i, &freq) in notes.iter().enumerate() {
            self.blip(
                ctx,
                freq,
                OscillatorType::Triangle,
                vol * 0.3,
                i as f64 * 0.1,
                0.18,
            );
        }
    }
}
