use thiserror::Error;

/// Startup configuration problems. These are checked once by
/// [`SwellConfig::validate`](crate::SwellConfig::validate) and never at
/// runtime.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("distance range is empty: min {min_cm} cm must be below max {max_cm} cm")]
    EmptyDistanceRange { min_cm: f32, max_cm: f32 },
    #[error("frequencies must be positive (got {min_hz} Hz .. {max_hz} Hz)")]
    NonPositiveFrequency { min_hz: f32, max_hz: f32 },
    #[error("frequency range is inverted: {min_hz} Hz > {max_hz} Hz")]
    InvertedFrequencyRange { min_hz: f32, max_hz: f32 },
    #[error("amplitude range {min} .. {max} must satisfy 0 <= min <= max <= 1")]
    AmplitudeOutOfRange { min: f32, max: f32 },
    #[error("at least one oscillator is required")]
    NoOscillators,
    #[error("blob size must be at least one pixel")]
    ZeroBlobSize,
    #[error("poll period must be non-zero")]
    ZeroPollPeriod,
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(&'static str),
    #[error("palette has no colors")]
    EmptyPalette,
    #[error("strip has no pixels")]
    ZeroPixels,
    #[error("waveform table needs at least one sample")]
    ZeroWaveformSamples,
}

#[derive(Debug, Error)]
pub enum SwellError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("distance sensor: {0}")]
    Sensor(String),
    #[error("audio output: {0}")]
    Audio(String),
    #[error("led strip: {0}")]
    Strip(String),
}

pub type Result<T> = std::result::Result<T, SwellError>;
