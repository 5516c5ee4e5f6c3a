//! Sound cues
//!
//! Procedurally generated with the Web Audio API, no asset files. Playback is
//! fire-and-forget: every node error is swallowed.

use crate::sim::{EnemyTier, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player shot
    Laser,
    /// Enemy destroyed; bigger tiers get a heavier blast
    EnemyDestroyed(EnemyTier),
    /// Wave cleared
    WaveClear,
    /// Enemy crossed the defense line
    LifeLost,
    /// Game over
    GameOver,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// The cue a simulation event should trigger, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        Some(match event {
            GameEvent::ShotFired => Self::Laser,
            GameEvent::EnemyDestroyed { tier, .. } => Self::EnemyDestroyed(*tier),
            GameEvent::WaveCleared { .. } => Self::WaveClear,
            GameEvent::LifeLost { .. } => Self::LifeLost,
            GameEvent::GameOver { .. } => Self::GameOver,
        })
    }
}

/// Something that can play cues
pub trait SoundSink {
    fn play(&self, effect: SoundEffect);

    fn set_muted(&mut self, muted: bool);
}

/// Discards every cue (headless runs, tests)
#[derive(Debug, Default)]
pub struct Silence;

impl SoundSink for Silence {
    fn play(&self, _effect: SoundEffect) {}

    fn set_muted(&mut self, _muted: bool) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, SoundSink};
    use crate::settings::Settings;
    use crate::sim::EnemyTier;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: settings.master_volume.clamp(0.0, 1.0),
                sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
                muted: settings.muted,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

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

        /// Short downward zap
        fn play_laser(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency().set_value_at_time(880.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(220.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.12).ok();
        }

        /// Noisy burst, lower and longer for higher tiers
        fn play_explosion(&self, ctx: &AudioContext, vol: f32, tier: EnemyTier) {
            let weight = tier.level() as f32;
            let base = 220.0 - 30.0 * weight;
            let length = 0.15 + 0.05 * weight as f64;
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, base, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + length)
                    .ok();
                osc.frequency().set_value_at_time(base, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(30.0, t + length)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + length + 0.05).ok();
            }

            // High crack
            if let Some((osc, gain)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.08).ok();
            }
        }

        /// Rising arpeggio of `notes`, `step` seconds apart
        fn play_arpeggio(
            &self,
            ctx: &AudioContext,
            vol: f32,
            notes: &[f32],
            step: f64,
            osc_type: OscillatorType,
        ) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * step;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + step * 3.0)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + step * 4.0).ok();
                }
            }
        }

        /// Ominous descend
        fn play_life_lost(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.6)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.7).ok();
        }
    }

    impl SoundSink for AudioManager {
        fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Laser => self.play_laser(ctx, vol),
                SoundEffect::EnemyDestroyed(tier) => self.play_explosion(ctx, vol, tier),
                SoundEffect::WaveClear => self.play_arpeggio(
                    ctx,
                    vol,
                    &[400.0, 500.0, 600.0, 800.0],
                    0.1,
                    OscillatorType::Triangle,
                ),
                SoundEffect::LifeLost => self.play_life_lost(ctx, vol),
                SoundEffect::GameOver => self.play_arpeggio(
                    ctx,
                    vol,
                    &[400.0, 350.0, 300.0, 200.0],
                    0.2,
                    OscillatorType::Sine,
                ),
                SoundEffect::HighScore => self.play_arpeggio(
                    ctx,
                    vol,
                    &[500.0, 600.0, 700.0, 800.0, 1000.0],
                    0.08,
                    OscillatorType::Triangle,
                ),
            }
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
    }
}
