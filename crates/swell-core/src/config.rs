use std::time::Duration;

use crate::color::{Rgb, DEFAULT_PALETTE};
use crate::constants::*;
use crate::envelope::EnvelopeShape;
use crate::error::ConfigError;

/// Every tuning value the system reads. Fixed at startup; there is no file or
/// command-line layer on top of it.
#[derive(Clone, Debug)]
pub struct SwellConfig {
    pub min_cm: f32,
    pub max_cm: f32,
    pub min_freq: f32,
    pub max_freq: f32,
    pub min_amp: f32,
    pub max_amp: f32,
    pub num_oscillators: usize,
    pub max_detune: f32,
    pub envelope: EnvelopeShape,
    pub num_pixels: usize,
    pub blob_size: usize,
    pub palette: Vec<Rgb>,
    pub fade_ticks: u32,
    pub poll_period: Duration,
    pub waveform_samples: usize,
    pub waveform_peak: i16,
}

impl Default for SwellConfig {
    fn default() -> Self {
        Self {
            min_cm: MIN_CM,
            max_cm: MAX_CM,
            min_freq: MIN_FREQ,
            max_freq: MAX_FREQ,
            min_amp: MIN_AMP,
            max_amp: MAX_AMP,
            num_oscillators: NUM_OSCILLATORS,
            max_detune: MAX_DETUNE,
            envelope: EnvelopeShape::default(),
            num_pixels: NUM_PIXELS,
            blob_size: BLOB_SIZE,
            palette: DEFAULT_PALETTE.to_vec(),
            fade_ticks: FADE_TICKS,
            poll_period: Duration::from_millis(POLL_PERIOD_MS),
            waveform_samples: WAVEFORM_SAMPLES,
            waveform_peak: WAVEFORM_PEAK,
        }
    }
}

impl SwellConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Negated comparisons also reject NaN.
        if !(self.min_cm < self.max_cm) {
            return Err(ConfigError::EmptyDistanceRange {
                min_cm: self.min_cm,
                max_cm: self.max_cm,
            });
        }
        if !(self.min_freq > 0.0 && self.max_freq > 0.0) {
            return Err(ConfigError::NonPositiveFrequency {
                min_hz: self.min_freq,
                max_hz: self.max_freq,
            });
        }
        if self.min_freq > self.max_freq {
            return Err(ConfigError::InvertedFrequencyRange {
                min_hz: self.min_freq,
                max_hz: self.max_freq,
            });
        }
        if !(0.0 <= self.min_amp && self.min_amp <= self.max_amp && self.max_amp <= 1.0) {
            return Err(ConfigError::AmplitudeOutOfRange {
                min: self.min_amp,
                max: self.max_amp,
            });
        }
        if self.num_oscillators == 0 {
            return Err(ConfigError::NoOscillators);
        }
        self.envelope.validate()?;
        if self.num_pixels == 0 {
            return Err(ConfigError::ZeroPixels);
        }
        if self.blob_size == 0 {
            return Err(ConfigError::ZeroBlobSize);
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.poll_period.is_zero() {
            return Err(ConfigError::ZeroPollPeriod);
        }
        if self.waveform_samples == 0 {
            return Err(ConfigError::ZeroWaveformSamples);
        }
        Ok(())
    }
}
