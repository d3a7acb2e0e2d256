//! Note lifecycle for the single unison voice.
//!
//! Silent + in range presses a fresh set of detuned oscillators, Sounding +
//! in range glides them to the new pitch and level, and Sounding + out of
//! range releases them. Released oscillators are forgotten immediately; the
//! bank is free to let them ring out while a later generation attacks.

use log::debug;
use smallvec::SmallVec;

use crate::config::SwellConfig;
use crate::constants::NUM_OSCILLATORS;
use crate::envelope::EnvelopeShape;
use crate::error::Result;
use crate::hardware::{OscillatorBank, OscillatorParams};
use crate::mapping::ControlTarget;
use crate::waveform::Wavetable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceState {
    Silent,
    Sounding,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceTransition {
    /// Silent -> Sounding.
    Attack,
    /// Sounding -> Sounding with new pitch and level.
    Retarget,
    /// Sounding -> Silent.
    Release,
    /// Silent and nothing in range.
    Idle,
}

/// Frequency multiplier for `slot` out of `num_oscillators`. Slot
/// `num_oscillators / 2` (integer division) sits on the base pitch; lower
/// slots are flat and higher ones sharp.
pub fn detune_ratio(slot: usize, num_oscillators: usize, max_detune: f32) -> f32 {
    let center = (num_oscillators / 2) as f32;
    1.0 + (slot as f32 - center) * max_detune
}

#[derive(Clone, Debug)]
pub struct Oscillator<H> {
    pub detune_ratio: f32,
    pub frequency_hz: f32,
    pub amplitude: f32,
    pub handle: H,
}

pub struct VoiceManager<B: OscillatorBank> {
    bank: B,
    waveform: Wavetable,
    envelope: EnvelopeShape,
    detune_ratios: SmallVec<[f32; NUM_OSCILLATORS]>,
    active: SmallVec<[Oscillator<B::Handle>; NUM_OSCILLATORS]>,
    state: VoiceState,
    generation: u64,
}

impl<B: OscillatorBank> VoiceManager<B> {
    pub fn new(bank: B, config: &SwellConfig) -> Self {
        let n = config.num_oscillators;
        Self {
            bank,
            waveform: Wavetable::sine(config.waveform_samples, config.waveform_peak),
            envelope: config.envelope,
            detune_ratios: (0..n)
                .map(|slot| detune_ratio(slot, n, config.max_detune))
                .collect(),
            active: SmallVec::with_capacity(n),
            state: VoiceState::Silent,
            generation: 0,
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_sounding(&self) -> bool {
        self.state == VoiceState::Sounding
    }

    pub fn oscillators(&self) -> &[Oscillator<B::Handle>] {
        &self.active
    }

    pub fn detune_ratios(&self) -> &[f32] {
        &self.detune_ratios
    }

    /// Number of attacks so far; stamped on every oscillator pressed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    /// Drive the state machine with this tick's reading (`None` = out of range).
    /// A bank error leaves the voice in whatever state it had reached.
    pub fn update(&mut self, target: Option<&ControlTarget>) -> Result<VoiceTransition> {
        let transition = match (self.state, target) {
            (VoiceState::Silent, Some(t)) => {
                self.press(t)?;
                VoiceTransition::Attack
            }
            (VoiceState::Sounding, Some(t)) => {
                self.retarget(t)?;
                VoiceTransition::Retarget
            }
            (VoiceState::Sounding, None) => {
                self.release()?;
                VoiceTransition::Release
            }
            (VoiceState::Silent, None) => VoiceTransition::Idle,
        };
        Ok(transition)
    }

    fn press(&mut self, target: &ControlTarget) -> Result<()> {
        self.generation += 1;
        // Sounding before the first press, so a partial bank still gets released.
        self.state = VoiceState::Sounding;
        for &ratio in &self.detune_ratios {
            let frequency_hz = target.frequency_hz * ratio;
            let handle = self.bank.press(OscillatorParams {
                frequency_hz,
                amplitude: target.amplitude,
                waveform: self.waveform.clone(),
                envelope: self.envelope,
                generation: self.generation,
            })?;
            self.active.push(Oscillator {
                detune_ratio: ratio,
                frequency_hz,
                amplitude: target.amplitude,
                handle,
            });
        }
        debug!(
            "voice {} pressed: {} oscillators around {:.1} Hz @ {:.2}",
            self.generation,
            self.active.len(),
            target.frequency_hz,
            target.amplitude
        );
        Ok(())
    }

    fn retarget(&mut self, target: &ControlTarget) -> Result<()> {
        for osc in self.active.iter_mut() {
            osc.frequency_hz = target.frequency_hz * osc.detune_ratio;
            osc.amplitude = target.amplitude;
            self.bank.set_frequency(&osc.handle, osc.frequency_hz)?;
            self.bank.set_amplitude(&osc.handle, osc.amplitude)?;
        }
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        let handles: SmallVec<[B::Handle; NUM_OSCILLATORS]> =
            self.active.drain(..).map(|osc| osc.handle).collect();
        self.state = VoiceState::Silent;
        self.bank.release(&handles)?;
        debug!("voice {} released", self.generation);
        Ok(())
    }
}
