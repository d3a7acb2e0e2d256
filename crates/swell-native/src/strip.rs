//! LED strip shown in the window: the control thread stages pixels and
//! `show` publishes them, scaled by the strip brightness, to the renderer.

use std::sync::{Arc, Mutex};

use swell_core::{PixelStrip, Result, Rgb, SwellError};

/// Last frame latched by `show`, read by the render thread.
#[derive(Clone, Debug)]
pub struct StripFrame {
    pub pixels: Vec<Rgb>,
    pub shows: u64,
}

impl StripFrame {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Rgb::BLACK; len],
            shows: 0,
        }
    }
}

pub struct WindowStrip {
    staged: Vec<Rgb>,
    brightness: f32,
    frame: Arc<Mutex<StripFrame>>,
}

impl WindowStrip {
    pub fn new(len: usize, brightness: f32, frame: Arc<Mutex<StripFrame>>) -> Self {
        Self {
            staged: vec![Rgb::BLACK; len],
            brightness: brightness.clamp(0.0, 1.0),
            frame,
        }
    }
}

impl PixelStrip for WindowStrip {
    fn len(&self) -> usize {
        self.staged.len()
    }

    fn set_pixel(&mut self, index: usize, color: Rgb) {
        if let Some(p) = self.staged.get_mut(index) {
            *p = color;
        }
    }

    fn show(&mut self) -> Result<()> {
        let mut frame = self
            .frame
            .lock()
            .map_err(|_| SwellError::Strip("frame buffer poisoned".into()))?;
        if frame.pixels.len() != self.staged.len() {
            return Err(SwellError::Strip(format!(
                "frame holds {} pixels, strip has {}",
                frame.pixels.len(),
                self.staged.len()
            )));
        }
        for (dst, src) in frame.pixels.iter_mut().zip(&self.staged) {
            *dst = src.scale(self.brightness);
        }
        frame.shows += 1;
        Ok(())
    }
}
