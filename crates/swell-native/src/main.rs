mod audio;
mod render;
mod sensor;
mod strip;

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use log::{error, info};
use swell_core::{ControlLoop, SwellConfig, SAMPLE_RATE, SENSOR_TIMING_BUDGET_MS, STRIP_BRIGHTNESS};
use winit::dpi::LogicalSize;
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

use crate::render::GpuState;
use crate::sensor::{PointerSensor, PointerState};
use crate::strip::{StripFrame, WindowStrip};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = SwellConfig::default();
    config.validate().context("invalid tuning")?;
    info!(
        "deep swell blob running: {:.0}-{:.0} cm -> {:.1}-{:.1} Hz on {} LEDs",
        config.min_cm, config.max_cm, config.min_freq, config.max_freq, config.num_pixels
    );

    // Shared between the control thread, the audio callback and the window
    let frame = Arc::new(Mutex::new(StripFrame::new(config.num_pixels)));
    let pointer = Arc::new(Mutex::new(PointerState::default()));

    let (bank, _audio_stream) = audio::start(SAMPLE_RATE).context("starting audio output")?;
    let strip = WindowStrip::new(config.num_pixels, STRIP_BRIGHTNESS, Arc::clone(&frame));
    let sensor = PointerSensor::start(
        Arc::clone(&pointer),
        Duration::from_millis(SENSOR_TIMING_BUDGET_MS),
    );
    let mut control =
        ControlLoop::new(&config, sensor, bank, strip).context("building control loop")?;
    control.clear_strip().context("clearing strip")?;

    thread::Builder::new()
        .name("swell-control".into())
        .spawn(move || {
            if let Err(err) = control.run() {
                // Hardware faults are not retried; let a supervisor restart us.
                error!("control loop stopped: {err}");
                std::process::exit(1);
            }
        })
        .context("spawning control thread")?;

    let event_loop = EventLoop::new().context("creating event loop")?;
    let window = WindowBuilder::new()
        .with_title("Deep Swell (move the pointer left to get closer)")
        .with_inner_size(LogicalSize::new(1344.0, 252.0))
        .build(&event_loop)
        .context("creating window")?;

    let mut state =
        pollster::block_on(GpuState::new(&window, Arc::clone(&frame))).context("initialising GPU")?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => state.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event: WindowEvent::CursorMoved { position, .. },
            ..
        } => {
            let width = state.window.inner_size().width.max(1) as f64;
            let mut p = pointer.lock().unwrap_or_else(PoisonError::into_inner);
            p.x_frac = Some((position.x / width) as f32);
        }
        Event::WindowEvent {
            event: WindowEvent::CursorLeft { .. },
            ..
        } => {
            pointer.lock().unwrap_or_else(PoisonError::into_inner).x_frac = None;
        }
        Event::AboutToWait => match state.render() {
            Ok(_) => state.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
            Err(_) => {}
        },
        _ => {}
    })?;
    Ok(())
}
