//! Web Audio playback
//!
//! Procedurally generated cues, no asset files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{AudioSink, SoundEffect};
use crate::settings::Settings;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Fails outside a secure context; the game runs silent then
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

    /// Rising triangle chirp
    fn play_jump(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(400.0, t + 0.1)
            .ok();
        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Short bright blip
    fn play_collect(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency().set_value_at_time(1200.0, t + 0.05).ok();
        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Falling sawtooth
    fn play_death(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .linear_ramp_to_value_at_time(50.0, t + 0.3)
            .ok();
        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.01, t + 0.3).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// C major arpeggio
    fn play_win(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.25, 659.25, 783.99, 1046.50].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.1, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Jump => self.play_jump(ctx, vol),
            SoundEffect::Collect => self.play_collect(ctx, vol),
            SoundEffect::Death => self.play_death(ctx, vol),
            SoundEffect::Win => self.play_win(ctx, vol),
        }
    }
}
