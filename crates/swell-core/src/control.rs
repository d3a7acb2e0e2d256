//! The polling loop that ties sensor, voice and strip together.

use std::convert::Infallible;
use std::time::Duration;

use instant::Instant;
use log::{debug, info, trace};

use crate::config::SwellConfig;
use crate::error::{Result, SwellError};
use crate::hardware::{DistanceSensor, OscillatorBank, PixelStrip};
use crate::lights::{shimmer_clock, LightRenderer, PixelBuffer};
use crate::mapping::Normalizer;
use crate::voice::{VoiceManager, VoiceTransition};

/// Countdown started when the voice is released.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeState {
    pub remaining: u32,
    pub last_amplitude: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// A sample was read and fed to the voice.
    Voice(VoiceTransition),
    /// No sample; one fade step was rendered.
    Faded { remaining: u32 },
    Idle,
}

pub struct ControlLoop<S, B, P>
where
    S: DistanceSensor,
    B: OscillatorBank,
    P: PixelStrip,
{
    sensor: S,
    strip: P,
    voice: VoiceManager<B>,
    normalizer: Normalizer,
    renderer: LightRenderer,
    buffer: PixelBuffer,
    fade: Option<FadeState>,
    last_amplitude: f32,
    fade_ticks: u32,
    poll_period: Duration,
    started: Instant,
}

impl<S, B, P> ControlLoop<S, B, P>
where
    S: DistanceSensor,
    B: OscillatorBank,
    P: PixelStrip,
{
    pub fn new(config: &SwellConfig, sensor: S, bank: B, strip: P) -> Result<Self> {
        config.validate()?;
        if strip.len() != config.num_pixels {
            return Err(SwellError::Strip(format!(
                "strip reports {} pixels, configuration expects {}",
                strip.len(),
                config.num_pixels
            )));
        }
        Ok(Self {
            sensor,
            strip,
            voice: VoiceManager::new(bank, config),
            normalizer: Normalizer::from_config(config),
            renderer: LightRenderer::new(config),
            buffer: PixelBuffer::new(config.num_pixels),
            fade: None,
            last_amplitude: 0.0,
            fade_ticks: config.fade_ticks,
            poll_period: config.poll_period,
            started: Instant::now(),
        })
    }

    pub fn voice(&self) -> &VoiceManager<B> {
        &self.voice
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn fade(&self) -> Option<&FadeState> {
        self.fade.as_ref()
    }

    pub fn last_amplitude(&self) -> f32 {
        self.last_amplitude
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn strip(&self) -> &P {
        &self.strip
    }

    /// Blank the strip before the first poll.
    pub fn clear_strip(&mut self) -> Result<()> {
        self.buffer.clear();
        self.buffer.flush(&mut self.strip)
    }

    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.tick_at(shimmer_clock(self.started.elapsed()))
    }

    /// One poll, with the shimmer clock pinned to `elapsed_sec`.
    pub fn tick_at(&mut self, elapsed_sec: f32) -> Result<TickOutcome> {
        if self.sensor.ready()? {
            let raw_cm = self.sensor.read_distance_cm()?;
            self.sensor.clear_ready_flag()?;
            return self.on_sample(raw_cm, elapsed_sec);
        }

        let Some(fade) = self.fade.as_mut() else {
            return Ok(TickOutcome::Idle);
        };
        fade.remaining = fade.remaining.saturating_sub(1);
        let (remaining, amplitude) = (fade.remaining, fade.last_amplitude);
        if remaining == 0 {
            self.fade = None;
            self.buffer.clear();
            debug!("fade complete");
        } else {
            self.renderer
                .render(&mut self.buffer, None, amplitude, true, elapsed_sec);
            trace!("fade tick, {remaining} left");
        }
        self.buffer.flush(&mut self.strip)?;
        Ok(TickOutcome::Faded { remaining })
    }

    fn on_sample(&mut self, raw_cm: Option<f32>, elapsed_sec: f32) -> Result<TickOutcome> {
        let target = self.normalizer.map(raw_cm);
        let transition = self.voice.update(target.as_ref())?;

        match (transition, &target) {
            (VoiceTransition::Attack, Some(t)) => {
                self.fade = None;
                info!(
                    "triggering at {:.1} cm -> {:.1} Hz @ {:.2}",
                    raw_cm.unwrap_or_default(),
                    t.frequency_hz,
                    t.amplitude
                );
            }
            (VoiceTransition::Release, _) => {
                info!("released, fading lights over {} ticks", self.fade_ticks);
                if self.fade_ticks > 0 {
                    self.fade = Some(FadeState {
                        remaining: self.fade_ticks,
                        last_amplitude: self.last_amplitude,
                    });
                } else {
                    self.buffer.clear();
                    self.buffer.flush(&mut self.strip)?;
                }
            }
            _ => {}
        }

        if let Some(t) = target {
            self.renderer.render(
                &mut self.buffer,
                Some(t.control),
                t.amplitude,
                false,
                elapsed_sec,
            );
            self.buffer.flush(&mut self.strip)?;
            self.last_amplitude = t.amplitude;
        }
        Ok(TickOutcome::Voice(transition))
    }

    /// Poll forever at the configured period. Only a collaborator error ends
    /// the loop.
    pub fn run(&mut self) -> Result<Infallible> {
        info!(
            "control loop running every {} ms",
            self.poll_period.as_millis()
        );
        let mut next = Instant::now();
        loop {
            self.tick()?;
            next += self.poll_period;
            let now = Instant::now();
            if next > now {
                std::thread::sleep(next - now);
            } else {
                // Overran the period; resync instead of bursting to catch up.
                next = now;
            }
        }
    }
}
