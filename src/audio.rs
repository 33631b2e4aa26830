//! Audio cues using Web Audio API
//!
//! Procedurally generated, so there are no sound files to fail loading.
//! Every call is best effort: a missing or suspended context just means
//! silence.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Puck reached the goal
    Goal,
    /// Polarity flipped
    Flip,
    /// Round timer hit zero
    TimeUp,
    /// Puck bounced off a wall
    Thud,
}

/// Looping hum while the magnet is pulling
struct Hum {
    osc: OscillatorNode,
    gain: GainNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    hum: Option<Hum>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: Settings::default().effective_volume(),
            hum: None,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
        if self.volume <= 0.0 {
            self.stop_hum();
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.resume().is_err() {
                log::warn!("AudioContext resume rejected");
            }
        }
    }

    /// Start or stop the attraction hum
    pub fn set_hum(&mut self, active: bool) {
        if active {
            self.start_hum();
        } else {
            self.stop_hum();
        }
    }

    fn start_hum(&mut self) {
        if self.hum.is_some() || self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        let Some((osc, gain)) = create_osc(ctx, 110.0, OscillatorType::Sawtooth) else {
            log::warn!("Could not build hum oscillator");
            return;
        };
        let t = ctx.current_time();
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(self.volume * 0.08, t + 0.1)
            .ok();
        if osc.start().is_err() {
            log::warn!("Hum playback rejected");
            return;
        }
        self.hum = Some(Hum { osc, gain });
    }

    fn stop_hum(&mut self) {
        let Some(hum) = self.hum.take() else { return };
        if let Some(ctx) = &self.ctx {
            let t = ctx.current_time();
            hum.gain.gain().set_value_at_time(hum.gain.gain().value(), t).ok();
            hum.gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.05).ok();
            hum.osc.stop_with_when(t + 0.06).ok();
        } else {
            hum.osc.stop().ok();
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            self.resume();
        }

        match effect {
            SoundEffect::Goal => play_goal(ctx, vol),
            SoundEffect::Flip => play_flip(ctx, vol),
            SoundEffect::TimeUp => play_time_up(ctx, vol),
            SoundEffect::Thud => play_thud(ctx, vol),
        }
    }
}

/// Create an oscillator routed through a gain node to the output
fn create_osc(
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

/// Goal - rising major arpeggio
fn play_goal(ctx: &AudioContext, vol: f32) {
    let t = ctx.current_time();
    for (i, freq) in [523.25_f32, 659.25, 783.99, 1046.5].iter().enumerate() {
        let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Triangle) else {
            return;
        };
        let start = t + i as f64 * 0.07;
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain().set_value_at_time(vol * 0.3, start).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, start + 0.25)
            .ok();
        osc.start_with_when(start).ok();
        osc.stop_with_when(start + 0.3).ok();
    }
}

/// Polarity flip - short blip
fn play_flip(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 660.0, OscillatorType::Square) else {
        return;
    };
    let t = ctx.current_time();
    gain.gain().set_value_at_time(vol * 0.12, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.06)
        .ok();
    osc.start().ok();
    osc.stop_with_when(t + 0.08).ok();
}

/// Time up - falling buzz
fn play_time_up(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 440.0, OscillatorType::Sawtooth) else {
        return;
    };
    let t = ctx.current_time();
    gain.gain().set_value_at_time(vol * 0.3, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.8)
        .ok();
    osc.frequency().set_value_at_time(440.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(110.0, t + 0.8)
        .ok();
    osc.start().ok();
    osc.stop_with_when(t + 0.85).ok();
}

/// Wall bounce - low thump
fn play_thud(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 90.0, OscillatorType::Sine) else {
        return;
    };
    let t = ctx.current_time();
    gain.gain().set_value_at_time(vol * 0.25, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.12)
        .ok();
    osc.frequency().set_value_at_time(90.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(45.0, t + 0.12)
        .ok();
    osc.start().ok();
    osc.stop_with_when(t + 0.15).ok();
}
