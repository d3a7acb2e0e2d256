// ---------------- Native audio (cpal) ----------------
//
// The control thread presses and retunes oscillators through `SynthBank`;
// the cpal callback mixes them. Both sides share one `Mutex<MixerState>`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use log::{debug, error, info, warn};
use swell_core::{Envelope, OscillatorBank, OscillatorParams, SwellError, Wavetable};

// Fraction of the distance to the target covered per output sample; about a
// 5 ms glide at 44.1 kHz so 20 Hz control updates do not click.
const PARAM_GLIDE: f32 = 0.005;

struct ActiveOscillator {
    id: u64,
    generation: u64,
    phase: f32, // cycles
    frequency_hz: f32,
    target_frequency_hz: f32,
    amplitude: f32,
    target_amplitude: f32,
    envelope: Envelope,
    waveform: Wavetable,
}

pub struct MixerState {
    sample_rate: f32,
    oscillators: Vec<ActiveOscillator>,
    next_id: u64,
}

impl MixerState {
    fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            oscillators: Vec::with_capacity(16),
            next_id: 0,
        }
    }

    fn find(&mut self, id: u64) -> Option<&mut ActiveOscillator> {
        self.oscillators.iter_mut().find(|o| o.id == id)
    }

    // Held oscillators never finish on their own, so a miss means the mixer
    // lost track of the voice.
    fn held(&mut self, id: u64) -> swell_core::Result<&mut ActiveOscillator> {
        self.find(id)
            .ok_or_else(|| SwellError::Audio(format!("oscillator {id} is no longer mixed")))
    }

    fn next_sample(&mut self) -> f32 {
        let sr = self.sample_rate;
        let mut mix = 0.0f32;
        let mut i = 0usize;
        while i < self.oscillators.len() {
            let osc = &mut self.oscillators[i];
            osc.frequency_hz += (osc.target_frequency_hz - osc.frequency_hz) * PARAM_GLIDE;
            osc.amplitude += (osc.target_amplitude - osc.amplitude) * PARAM_GLIDE;
            let level = osc.envelope.next_level();
            mix += osc.waveform.lookup(osc.phase) * osc.amplitude * level;
            osc.phase += osc.frequency_hz / sr;
            if osc.phase >= 1.0 {
                osc.phase -= 1.0;
            }
            if osc.envelope.is_done() {
                self.oscillators.swap_remove(i);
                continue;
            }
            i += 1;
        }
        mix.tanh()
    }

    fn fill<T>(&mut self, data: &mut [T], channels: usize)
    where
        T: SizedSample + FromSample<f32>,
    {
        for frame in data.chunks_mut(channels) {
            let value = T::from_sample(self.next_sample());
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }
    }
}

fn lock(state: &Mutex<MixerState>) -> MutexGuard<'_, MixerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to the shared mixer; implements the oscillator bank for the
/// control loop.
#[derive(Clone)]
pub struct SynthBank {
    state: Arc<Mutex<MixerState>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OscillatorId(u64);

impl SynthBank {
    /// The control side treats a mixer poisoned by a panicking audio
    /// callback as a dead output device.
    fn mixer(&self) -> swell_core::Result<MutexGuard<'_, MixerState>> {
        self.state
            .lock()
            .map_err(|_| SwellError::Audio("audio callback panicked".into()))
    }
}

impl OscillatorBank for SynthBank {
    type Handle = OscillatorId;

    fn press(&mut self, params: OscillatorParams) -> swell_core::Result<OscillatorId> {
        let mut guard = self.mixer()?;
        let id = guard.next_id;
        guard.next_id += 1;
        let sample_rate = guard.sample_rate;
        let lingering = guard
            .oscillators
            .iter()
            .filter(|o| o.generation < params.generation)
            .count();
        if lingering > 0 {
            debug!("pressing generation {} over {lingering} ringing oscillators", params.generation);
        }
        guard.oscillators.push(ActiveOscillator {
            id,
            generation: params.generation,
            phase: 0.0,
            frequency_hz: params.frequency_hz,
            target_frequency_hz: params.frequency_hz,
            amplitude: params.amplitude,
            target_amplitude: params.amplitude,
            envelope: Envelope::triggered(params.envelope, sample_rate),
            waveform: params.waveform,
        });
        Ok(OscillatorId(id))
    }

    fn set_frequency(&mut self, handle: &OscillatorId, hz: f32) -> swell_core::Result<()> {
        self.mixer()?.held(handle.0)?.target_frequency_hz = hz;
        Ok(())
    }

    fn set_amplitude(&mut self, handle: &OscillatorId, level: f32) -> swell_core::Result<()> {
        self.mixer()?.held(handle.0)?.target_amplitude = level;
        Ok(())
    }

    fn release(&mut self, handles: &[OscillatorId]) -> swell_core::Result<()> {
        let mut guard = self.mixer()?;
        for handle in handles {
            if let Some(osc) = guard.find(handle.0) {
                osc.envelope.release();
            }
        }
        Ok(())
    }
}

/// Open the default output device and start streaming. The returned stream
/// must stay alive on the calling thread for as long as audio should play.
pub fn start(preferred_sample_rate: u32) -> anyhow::Result<(SynthBank, cpal::Stream)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("no audio output device"))?;
    let supported = device
        .default_output_config()
        .context("querying default output config")?;
    let sample_rate = supported.sample_rate().0;
    if sample_rate != preferred_sample_rate {
        warn!("device runs at {sample_rate} Hz (nominal {preferred_sample_rate} Hz)");
    }
    let channels = supported.channels() as usize;

    let state = Arc::new(Mutex::new(MixerState::new(sample_rate as f32)));
    let config: cpal::StreamConfig = supported.config();
    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, channels, &state),
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, channels, &state),
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, channels, &state),
        other => return Err(anyhow!("unsupported sample format {other:?}")),
    }
    .context("building output stream")?;
    stream.play().context("starting output stream")?;
    info!(
        "audio out: {} @ {sample_rate} Hz, {channels} ch",
        device.name().unwrap_or_else(|_| "unknown device".into())
    );

    Ok((SynthBank { state }, stream))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    state: &Arc<Mutex<MixerState>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    let state = Arc::clone(state);
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            lock(&state).fill(data, channels);
        },
        |err| error!("audio stream error: {err}"),
        None,
    )
}
