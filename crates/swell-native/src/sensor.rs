//! Pointer-driven stand-in for the time-of-flight sensor.
//!
//! The horizontal cursor position over the window plays the role of the
//! hand: the left edge is right at the sensor, the right edge is well out of
//! range. A cursor outside the window is "no target". New samples become
//! ready once per timing budget, with a little ranging noise.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::info;
use rand::prelude::*;
use swell_core::{DistanceSensor, Result, SwellError};

// Distance represented by the full window width.
pub const POINTER_SPAN_CM: f32 = 120.0;
// Standard deviation-ish jitter of a real ToF reading.
const RANGING_NOISE_CM: f32 = 0.6;

#[derive(Clone, Copy, Debug, Default)]
pub struct PointerState {
    /// Cursor x as a fraction of the window width; `None` when outside.
    pub x_frac: Option<f32>,
}

pub struct PointerSensor {
    pointer: Arc<Mutex<PointerState>>,
    timing_budget: Duration,
    last_ranging: Instant,
    ready: bool,
    latest_cm: Option<f32>,
    rng: StdRng,
}

impl PointerSensor {
    pub fn start(pointer: Arc<Mutex<PointerState>>, timing_budget: Duration) -> Self {
        info!(
            "pointer sensor ranging every {} ms over {POINTER_SPAN_CM} cm",
            timing_budget.as_millis()
        );
        Self {
            pointer,
            timing_budget,
            last_ranging: Instant::now(),
            ready: false,
            latest_cm: None,
            rng: StdRng::from_entropy(),
        }
    }

    fn range(&mut self) -> Result<Option<f32>> {
        let state = *self
            .pointer
            .lock()
            .map_err(|_| SwellError::Sensor("pointer state poisoned".into()))?;
        Ok(state.x_frac.map(|x| {
            let noise = self.rng.gen_range(-RANGING_NOISE_CM..=RANGING_NOISE_CM);
            (x.clamp(0.0, 1.0) * POINTER_SPAN_CM + noise).max(0.0)
        }))
    }
}

impl DistanceSensor for PointerSensor {
    fn ready(&mut self) -> Result<bool> {
        if !self.ready && self.last_ranging.elapsed() >= self.timing_budget {
            self.latest_cm = self.range()?;
            self.last_ranging = Instant::now();
            self.ready = true;
        }
        Ok(self.ready)
    }

    fn read_distance_cm(&mut self) -> Result<Option<f32>> {
        Ok(self.latest_cm)
    }

    fn clear_ready_flag(&mut self) -> Result<()> {
        self.ready = false;
        Ok(())
    }
}
