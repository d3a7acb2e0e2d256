//! Light blob rendering for the LED strip.
//!
//! The blob sits at the strip position given by the control value and takes
//! its color from the palette at the same position. Brightness falls off
//! linearly from the center and breathes with a slow per-pixel shimmer.
//! Outside the blob, pixels either go dark at once or, while a release fade
//! is running, decay a little every tick.

use std::time::Duration;

use crate::color::Rgb;
use crate::config::SwellConfig;
use crate::constants::*;
use crate::error::Result;
use crate::hardware::PixelStrip;
use crate::mapping::ControlValue;

/// Fixed-length frame of strip colors, index 0 at the left end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Rgb::BLACK; len],
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.pixels.get(index).copied()
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgb::BLACK);
    }

    pub fn is_dark(&self) -> bool {
        self.pixels.iter().all(|p| p.is_black())
    }

    /// Copy the frame to the strip and latch it.
    pub fn flush<S: PixelStrip + ?Sized>(&self, strip: &mut S) -> Result<()> {
        for (i, &color) in self.pixels.iter().enumerate().take(strip.len()) {
            strip.set_pixel(i, color);
        }
        strip.show()
    }
}

/// Time since start folded into one shimmer period, in seconds. Folding in
/// f64 keeps the f32 phase resolution constant however long the loop runs.
pub fn shimmer_clock(elapsed: Duration) -> f32 {
    let period = std::f64::consts::TAU / f64::from(SHIMMER_RATE);
    elapsed.as_secs_f64().rem_euclid(period) as f32
}

/// Breathing factor for pixel `index` at `elapsed_sec`, within
/// `[SHIMMER_BASE - SHIMMER_DEPTH, SHIMMER_BASE + SHIMMER_DEPTH]`.
#[inline]
pub fn shimmer(elapsed_sec: f32, index: usize) -> f32 {
    SHIMMER_BASE
        + SHIMMER_DEPTH * (elapsed_sec * SHIMMER_RATE + index as f32 * SHIMMER_PIXEL_PHASE).sin()
}

/// Brightness of a blob pixel `distance` away from the center, capped at 1.
#[inline]
pub fn blob_brightness(distance: usize, blob_size: usize, shimmer: f32, amplitude: f32) -> f32 {
    let falloff = 1.0 - distance as f32 / blob_size as f32;
    (falloff * shimmer * amplitude).min(1.0)
}

/// One fading step for a pixel outside the blob.
#[inline]
pub fn fade_pixel(color: Rgb) -> Rgb {
    let faded = color.scale(FADE_FACTOR);
    if faded.max_channel() > FADE_SNAP_LEVEL {
        faded
    } else {
        Rgb::BLACK
    }
}

pub struct LightRenderer {
    blob_size: usize,
    palette: Vec<Rgb>,
}

impl LightRenderer {
    pub fn new(config: &SwellConfig) -> Self {
        Self {
            blob_size: config.blob_size,
            palette: config.palette.clone(),
        }
    }

    pub fn blob_size(&self) -> usize {
        self.blob_size
    }

    /// Strip index of the blob center for `control` on a strip of `len` pixels.
    /// A control value of 1.0 puts the center one past the last pixel.
    pub fn blob_center(control: ControlValue, len: usize) -> usize {
        (control.get() * len as f32) as usize
    }

    pub fn blob_color(&self, control: ControlValue) -> Rgb {
        let last = self.palette.len().saturating_sub(1);
        let index = ((control.get() * last as f32) as usize).min(last);
        self.palette.get(index).copied().unwrap_or(Rgb::BLACK)
    }

    /// Recompute every pixel of `buffer` in place.
    ///
    /// `control = None` means there is no blob this frame; every pixel is
    /// handled as lying outside it.
    pub fn render(
        &self,
        buffer: &mut PixelBuffer,
        control: Option<ControlValue>,
        amplitude: f32,
        fading: bool,
        elapsed_sec: f32,
    ) {
        let len = buffer.len();
        let blob = control.map(|c| (Self::blob_center(c, len), self.blob_color(c)));

        for (i, pixel) in buffer.pixels.iter_mut().enumerate() {
            if amplitude < VISIBLE_AMP_THRESHOLD {
                *pixel = Rgb::BLACK;
                continue;
            }
            match blob {
                Some((center, color)) if i.abs_diff(center) < self.blob_size => {
                    let brightness = blob_brightness(
                        i.abs_diff(center),
                        self.blob_size,
                        shimmer(elapsed_sec, i),
                        amplitude,
                    );
                    *pixel = color.scale(brightness);
                }
                _ if fading => *pixel = fade_pixel(*pixel),
                _ => *pixel = Rgb::BLACK,
            }
        }
    }
}
