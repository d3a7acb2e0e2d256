//! Distance normalization and the curves that turn a normalized control value
//! into pitch and level.

use crate::config::SwellConfig;

/// Normalized control signal in `[0, 1]`: 0 is far away, 1 is at the sensor.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct ControlValue(f32);

impl ControlValue {
    pub const MIN: ControlValue = ControlValue(0.0);
    pub const MAX: ControlValue = ControlValue(1.0);

    /// Clamps into `[0, 1]`; NaN becomes 0.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reading {
    InRange(ControlValue),
    OutOfRange,
}

/// Map a raw reading onto a control value.
///
/// Readings nearer than `min_cm` saturate at 1.0; `max_cm` itself maps to 0.0
/// and is still in range. Anything farther, absent, negative or NaN is
/// [`Reading::OutOfRange`].
pub fn normalize(raw_cm: Option<f32>, min_cm: f32, max_cm: f32) -> Reading {
    let Some(cm) = raw_cm else {
        return Reading::OutOfRange;
    };
    if cm.is_nan() || cm < 0.0 || cm > max_cm {
        return Reading::OutOfRange;
    }
    let clamped = cm.clamp(min_cm, max_cm);
    Reading::InRange(ControlValue::new(1.0 - (clamped - min_cm) / (max_cm - min_cm)))
}

/// Exponential pitch curve so equal control steps sound like equal intervals.
pub fn frequency_for(control: ControlValue, min_freq: f32, max_freq: f32) -> f32 {
    let c = control.get();
    if c <= 0.0 {
        return min_freq;
    }
    if c >= 1.0 {
        return max_freq;
    }
    min_freq * (max_freq / min_freq).powf(c)
}

pub fn amplitude_for(control: ControlValue, min_amp: f32, max_amp: f32) -> f32 {
    min_amp + control.get() * (max_amp - min_amp)
}

/// Everything derived from one in-range reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlTarget {
    pub control: ControlValue,
    pub frequency_hz: f32,
    pub amplitude: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct Normalizer {
    pub min_cm: f32,
    pub max_cm: f32,
    pub min_freq: f32,
    pub max_freq: f32,
    pub min_amp: f32,
    pub max_amp: f32,
}

impl Normalizer {
    pub fn from_config(config: &SwellConfig) -> Self {
        Self {
            min_cm: config.min_cm,
            max_cm: config.max_cm,
            min_freq: config.min_freq,
            max_freq: config.max_freq,
            min_amp: config.min_amp,
            max_amp: config.max_amp,
        }
    }

    pub fn reading(&self, raw_cm: Option<f32>) -> Reading {
        normalize(raw_cm, self.min_cm, self.max_cm)
    }

    pub fn target(&self, control: ControlValue) -> ControlTarget {
        ControlTarget {
            control,
            frequency_hz: frequency_for(control, self.min_freq, self.max_freq),
            amplitude: amplitude_for(control, self.min_amp, self.max_amp),
        }
    }

    /// `None` when the reading is out of range.
    pub fn map(&self, raw_cm: Option<f32>) -> Option<ControlTarget> {
        match self.reading(raw_cm) {
            Reading::InRange(control) => Some(self.target(control)),
            Reading::OutOfRange => None,
        }
    }
}
