// Tuning constants shared by the core and the native front-end.

// Sensor range (centimeters)
pub const MIN_CM: f32 = 10.0; // at or nearer than this -> control value 1.0
pub const MAX_CM: f32 = 90.0; // beyond this the voice is released
pub const SENSOR_TIMING_BUDGET_MS: u64 = 100; // sensor integration time, startup only

// Pitch range (Hz)
pub const MIN_FREQ: f32 = 27.5; // A0
pub const MAX_FREQ: f32 = 220.0; // A3

// Oscillator level range
pub const MIN_AMP: f32 = 0.2;
pub const MAX_AMP: f32 = 0.5;

// Unison bank
pub const NUM_OSCILLATORS: usize = 4;
pub const MAX_DETUNE: f32 = 0.008; // proportional offset per slot step

// Envelope (seconds, sustain as a fraction of peak)
pub const ATTACK_SEC: f32 = 0.6;
pub const DECAY_SEC: f32 = 0.4;
pub const SUSTAIN_LEVEL: f32 = 0.7;
pub const RELEASE_SEC: f32 = 1.2;

// Audio output
pub const SAMPLE_RATE: u32 = 22_050;
pub const WAVEFORM_SAMPLES: usize = 256;
pub const WAVEFORM_PEAK: i16 = 30_000;

// LED strip
pub const NUM_PIXELS: usize = 336;
pub const STRIP_BRIGHTNESS: f32 = 0.5; // global scalar applied by the strip driver
pub const BLOB_SIZE: usize = 30; // radius of the lit region, in pixels

// Light rendering
pub const VISIBLE_AMP_THRESHOLD: f32 = 0.12; // below this the whole strip is dark
pub const SHIMMER_BASE: f32 = 0.5;
pub const SHIMMER_DEPTH: f32 = 0.3;
pub const SHIMMER_RATE: f32 = 3.0; // radians per second
pub const SHIMMER_PIXEL_PHASE: f32 = 0.25; // radians per pixel
pub const FADE_FACTOR: f32 = 0.7; // per fading tick
pub const FADE_SNAP_LEVEL: u8 = 5; // channels at or below this snap to off

// Control loop
pub const FADE_TICKS: u32 = 24;
pub const POLL_PERIOD_MS: u64 = 50;
