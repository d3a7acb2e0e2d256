//! Seams to the three pieces of hardware. The core never talks to a bus or a
//! sound card directly; front-ends implement these traits.

use crate::color::Rgb;
use crate::envelope::EnvelopeShape;
use crate::error::Result;
use crate::waveform::Wavetable;

/// Time-of-flight range sensor that raises a flag when a new sample is ready.
pub trait DistanceSensor {
    fn ready(&mut self) -> Result<bool>;
    /// Latest range in centimeters, `None` when the sensor could not range.
    fn read_distance_cm(&mut self) -> Result<Option<f32>>;
    fn clear_ready_flag(&mut self) -> Result<()>;
}

/// Everything needed to start one oscillator.
#[derive(Clone, Debug)]
pub struct OscillatorParams {
    pub frequency_hz: f32,
    pub amplitude: f32,
    pub waveform: Wavetable,
    pub envelope: EnvelopeShape,
    /// Voice generation this oscillator belongs to. Released generations may
    /// keep sounding in the mixer while a newer one attacks.
    pub generation: u64,
}

/// A mixer of independently pressed oscillators.
pub trait OscillatorBank {
    type Handle: Clone;

    fn press(&mut self, params: OscillatorParams) -> Result<Self::Handle>;
    fn set_frequency(&mut self, handle: &Self::Handle, hz: f32) -> Result<()>;
    fn set_amplitude(&mut self, handle: &Self::Handle, level: f32) -> Result<()>;
    /// Start the release phase; silence follows once the envelope runs out.
    fn release(&mut self, handles: &[Self::Handle]) -> Result<()>;
}

/// Addressable LED strip with a fixed pixel count. Writes are staged until
/// [`PixelStrip::show`].
pub trait PixelStrip {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set_pixel(&mut self, index: usize, color: Rgb);
    fn show(&mut self) -> Result<()>;
}
