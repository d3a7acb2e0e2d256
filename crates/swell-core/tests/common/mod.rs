// In-memory stand-ins for the sensor, synth and strip.

#![allow(dead_code)]

use std::collections::VecDeque;

use swell_core::{DistanceSensor, OscillatorBank, OscillatorParams, PixelStrip, Rgb, SwellError};

/// Sensor that yields one scripted poll per tick. `None` in the script means
/// "not ready"; `Some(reading)` means ready with that reading.
#[derive(Default)]
pub struct ScriptedSensor {
    pub polls: VecDeque<Option<Option<f32>>>,
    current: Option<Option<f32>>,
    pub cleared: usize,
    pub fail_next_read: bool,
}

impl ScriptedSensor {
    pub fn push_reading(&mut self, cm: f32) {
        self.polls.push_back(Some(Some(cm)));
    }

    pub fn push_no_target(&mut self) {
        self.polls.push_back(Some(None));
    }

    pub fn push_not_ready(&mut self, count: usize) {
        for _ in 0..count {
            self.polls.push_back(None);
        }
    }
}

impl DistanceSensor for ScriptedSensor {
    fn ready(&mut self) -> swell_core::Result<bool> {
        self.current = self.polls.pop_front().flatten();
        Ok(self.current.is_some())
    }

    fn read_distance_cm(&mut self) -> swell_core::Result<Option<f32>> {
        if self.fail_next_read {
            return Err(SwellError::Sensor("i2c nack".into()));
        }
        Ok(self.current.flatten())
    }

    fn clear_ready_flag(&mut self) -> swell_core::Result<()> {
        self.cleared += 1;
        self.current = None;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct PressedOscillator {
    pub frequency_hz: f32,
    pub amplitude: f32,
    pub generation: u64,
    pub released: bool,
}

/// Bank that records every call; handles index into `oscillators`.
/// `fail_after_presses` makes every press beyond that count fail.
#[derive(Default)]
pub struct RecordingBank {
    pub oscillators: Vec<PressedOscillator>,
    pub release_calls: usize,
    pub fail_after_presses: Option<usize>,
    pub fail_updates: bool,
}

impl RecordingBank {
    pub fn sounding(&self) -> impl Iterator<Item = &PressedOscillator> {
        self.oscillators.iter().filter(|o| !o.released)
    }
}

impl OscillatorBank for RecordingBank {
    type Handle = usize;

    fn press(&mut self, params: OscillatorParams) -> swell_core::Result<usize> {
        if self
            .fail_after_presses
            .is_some_and(|limit| self.oscillators.len() >= limit)
        {
            return Err(SwellError::Audio("device unplugged".into()));
        }
        self.oscillators.push(PressedOscillator {
            frequency_hz: params.frequency_hz,
            amplitude: params.amplitude,
            generation: params.generation,
            released: false,
        });
        Ok(self.oscillators.len() - 1)
    }

    fn set_frequency(&mut self, handle: &usize, hz: f32) -> swell_core::Result<()> {
        if self.fail_updates {
            return Err(SwellError::Audio("device unplugged".into()));
        }
        self.oscillators[*handle].frequency_hz = hz;
        Ok(())
    }

    fn set_amplitude(&mut self, handle: &usize, level: f32) -> swell_core::Result<()> {
        self.oscillators[*handle].amplitude = level;
        Ok(())
    }

    fn release(&mut self, handles: &[usize]) -> swell_core::Result<()> {
        self.release_calls += 1;
        for &h in handles {
            self.oscillators[h].released = true;
        }
        Ok(())
    }
}

pub struct MemoryStrip {
    pub staged: Vec<Rgb>,
    pub shown: Vec<Rgb>,
    pub shows: usize,
}

impl MemoryStrip {
    pub fn new(len: usize) -> Self {
        Self {
            staged: vec![Rgb::BLACK; len],
            shown: vec![Rgb::BLACK; len],
            shows: 0,
        }
    }

    pub fn lit(&self) -> usize {
        self.shown.iter().filter(|p| !p.is_black()).count()
    }
}

impl PixelStrip for MemoryStrip {
    fn len(&self) -> usize {
        self.staged.len()
    }

    fn set_pixel(&mut self, index: usize, color: Rgb) {
        self.staged[index] = color;
    }

    fn show(&mut self) -> swell_core::Result<()> {
        self.shown.copy_from_slice(&self.staged);
        self.shows += 1;
        Ok(())
    }
}

pub fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}
