//! Attack/decay/sustain/release contour shared by every oscillator of a voice.
//!
//! [`EnvelopeShape`] is the immutable startup configuration. [`Envelope`] is
//! the per-oscillator generator an audio back-end advances once per output
//! sample; the core itself only needs the shape.

use crate::constants::{ATTACK_SEC, DECAY_SEC, RELEASE_SEC, SUSTAIN_LEVEL};
use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeShape {
    pub attack_sec: f32,
    pub decay_sec: f32,
    pub sustain_level: f32,
    pub release_sec: f32,
}

impl Default for EnvelopeShape {
    fn default() -> Self {
        Self {
            attack_sec: ATTACK_SEC,
            decay_sec: DECAY_SEC,
            sustain_level: SUSTAIN_LEVEL,
            release_sec: RELEASE_SEC,
        }
    }
}

impl EnvelopeShape {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.attack_sec >= 0.0 && self.decay_sec >= 0.0 && self.release_sec >= 0.0) {
            return Err(ConfigError::InvalidEnvelope("durations must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.sustain_level) {
            return Err(ConfigError::InvalidEnvelope("sustain level must be within 0..=1"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeStage {
    Attack,
    Decay,
    Sustain,
    Release,
    Done,
}

/// Linear-segment ADSR generator.
#[derive(Clone, Debug)]
pub struct Envelope {
    shape: EnvelopeShape,
    sample_rate: f32,
    stage: EnvelopeStage,
    level: f32,
    release_step: f32,
}

impl Envelope {
    /// A freshly pressed envelope, starting its attack at zero.
    pub fn triggered(shape: EnvelopeShape, sample_rate: f32) -> Self {
        Self {
            shape,
            sample_rate,
            stage: EnvelopeStage::Attack,
            level: 0.0,
            release_step: 0.0,
        }
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_done(&self) -> bool {
        self.stage == EnvelopeStage::Done
    }

    /// Begin the release phase from whatever level the envelope is at.
    pub fn release(&mut self) {
        if matches!(self.stage, EnvelopeStage::Release | EnvelopeStage::Done) {
            return;
        }
        let samples = self.shape.release_sec * self.sample_rate;
        if samples < 1.0 || self.level <= 0.0 {
            self.level = 0.0;
            self.stage = EnvelopeStage::Done;
        } else {
            self.release_step = self.level / samples;
            self.stage = EnvelopeStage::Release;
        }
    }

    /// Advance by one sample and return the new level.
    pub fn next_level(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Attack => {
                let samples = self.shape.attack_sec * self.sample_rate;
                self.level = if samples < 1.0 {
                    1.0
                } else {
                    (self.level + 1.0 / samples).min(1.0)
                };
                if self.level >= 1.0 {
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                let sustain = self.shape.sustain_level;
                let samples = self.shape.decay_sec * self.sample_rate;
                self.level = if samples < 1.0 {
                    sustain
                } else {
                    (self.level - (1.0 - sustain) / samples).max(sustain)
                };
                if self.level <= sustain {
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => self.level = self.shape.sustain_level,
            EnvelopeStage::Release => {
                self.level = (self.level - self.release_step).max(0.0);
                if self.level <= 0.0 {
                    self.stage = EnvelopeStage::Done;
                }
            }
            EnvelopeStage::Done => self.level = 0.0,
        }
        self.level
    }
}
