mod common;

use common::{approx, MemoryStrip, RecordingBank, ScriptedSensor};
use swell_core::*;

type Loop = ControlLoop<ScriptedSensor, RecordingBank, MemoryStrip>;

fn make_loop() -> Loop {
    let config = SwellConfig::default();
    ControlLoop::new(
        &config,
        ScriptedSensor::default(),
        RecordingBank::default(),
        MemoryStrip::new(config.num_pixels),
    )
    .expect("default configuration is valid")
}

#[test]
fn nearest_reading_triggers_a_full_voice() {
    let mut cl = make_loop();
    cl.sensor_mut().push_reading(10.0);

    assert_eq!(cl.tick_at(0.0).unwrap(), TickOutcome::Voice(VoiceTransition::Attack));
    let voice = cl.voice();
    assert_eq!(voice.state(), VoiceState::Sounding);
    assert_eq!(voice.oscillators().len(), 4);
    for osc in voice.oscillators() {
        assert!(approx(osc.frequency_hz / osc.detune_ratio, 220.0, 1e-3));
        assert!(approx(osc.amplitude, 0.5, 1e-6));
    }
    assert!(approx(cl.last_amplitude(), 0.5, 1e-6));
    assert_eq!(cl.strip().shows, 1);
    assert!(cl.strip().lit() > 0);
    assert_eq!(cl.sensor_mut().cleared, 1);
}

#[test]
fn mid_range_reading_maps_to_expected_tone() {
    let mut cl = make_loop();
    cl.sensor_mut().push_reading(50.0);
    cl.tick_at(0.0).unwrap();

    let base = cl.voice().oscillators()[0].frequency_hz / cl.voice().oscillators()[0].detune_ratio;
    assert!(approx(base, 77.78, 0.01), "base {base}");
    assert!(approx(cl.last_amplitude(), 0.35, 1e-6));
}

#[test]
fn far_reading_while_sounding_releases_and_arms_fade() {
    let mut cl = make_loop();
    cl.sensor_mut().push_reading(30.0);
    cl.sensor_mut().push_reading(999.0);
    cl.tick_at(0.0).unwrap();

    assert_eq!(cl.tick_at(0.05).unwrap(), TickOutcome::Voice(VoiceTransition::Release));
    assert_eq!(cl.voice().state(), VoiceState::Silent);
    assert!(cl.voice().oscillators().is_empty());
    assert_eq!(cl.voice().bank().release_calls, 1);
    let fade = cl.fade().expect("fade armed");
    assert_eq!(fade.remaining, FADE_TICKS);
    assert_eq!(fade.remaining, 24);
    assert!(approx(fade.last_amplitude, cl.last_amplitude(), 1e-6));
}

#[test]
fn sensor_without_target_counts_as_out_of_range() {
    let mut cl = make_loop();
    cl.sensor_mut().push_reading(30.0);
    cl.sensor_mut().push_no_target();
    cl.tick_at(0.0).unwrap();
    assert_eq!(cl.tick_at(0.05).unwrap(), TickOutcome::Voice(VoiceTransition::Release));
}

#[test]
fn fade_counts_down_and_clears_the_strip() {
    let mut cl = make_loop();
    cl.sensor_mut().push_reading(40.0);
    cl.sensor_mut().push_reading(999.0);
    cl.sensor_mut().push_not_ready(30);
    cl.tick_at(0.0).unwrap();
    cl.tick_at(0.05).unwrap();
    let lit_before = cl.strip().lit();
    assert!(lit_before > 0);

    let mut t = 0.1;
    for expected in (0..FADE_TICKS).rev() {
        assert_eq!(
            cl.tick_at(t).unwrap(),
            TickOutcome::Faded {
                remaining: expected
            }
        );
        t += 0.05;
    }
    assert!(cl.fade().is_none());
    assert!(cl.buffer().is_dark());
    assert_eq!(cl.strip().lit(), 0);

    let shows = cl.strip().shows;
    assert_eq!(cl.tick_at(t).unwrap(), TickOutcome::Idle);
    assert_eq!(cl.strip().shows, shows);
}

#[test]
fn fade_ticks_dim_monotonically() {
    let mut cl = make_loop();
    cl.sensor_mut().push_reading(40.0);
    cl.sensor_mut().push_reading(999.0);
    cl.sensor_mut().push_not_ready(5);
    cl.tick_at(0.0).unwrap();
    cl.tick_at(0.05).unwrap();

    let mut prev: Vec<Rgb> = cl.strip().shown.clone();
    for _ in 0..5 {
        cl.tick_at(0.1).unwrap();
        for (a, b) in prev.iter().zip(&cl.strip().shown) {
            assert!(b.max_channel() <= a.max_channel());
        }
        prev = cl.strip().shown.clone();
    }
}

#[test]
fn out_of_range_while_silent_does_nothing() {
    let mut cl = make_loop();
    cl.sensor_mut().push_reading(500.0);
    assert_eq!(cl.tick_at(0.0).unwrap(), TickOutcome::Voice(VoiceTransition::Idle));
    assert!(cl.fade().is_none());
    assert_eq!(cl.strip().shows, 0);
    assert_eq!(cl.voice().bank().release_calls, 0);
}

#[test]
fn not_ready_and_no_fade_is_idle() {
    let mut cl = make_loop();
    cl.sensor_mut().push_not_ready(3);
    for _ in 0..3 {
        assert_eq!(cl.tick_at(0.0).unwrap(), TickOutcome::Idle);
    }
    assert_eq!(cl.sensor_mut().cleared, 0);
}

#[test]
fn consecutive_in_range_readings_retarget() {
    let mut cl = make_loop();
    cl.sensor_mut().push_reading(80.0);
    cl.sensor_mut().push_reading(20.0);
    cl.tick_at(0.0).unwrap();
    assert_eq!(cl.tick_at(0.05).unwrap(), TickOutcome::Voice(VoiceTransition::Retarget));
    assert_eq!(cl.voice().bank().oscillators.len(), NUM_OSCILLATORS);
    assert_eq!(cl.voice().generation(), 1);
}

#[test]
fn re_attack_cancels_a_running_fade() {
    let mut cl = make_loop();
    cl.sensor_mut().push_reading(40.0);
    cl.sensor_mut().push_reading(999.0);
    cl.sensor_mut().push_not_ready(3);
    cl.sensor_mut().push_reading(60.0);
    cl.sensor_mut().push_not_ready(1);
    for _ in 0..5 {
        cl.tick_at(0.0).unwrap();
    }
    assert_eq!(cl.fade().unwrap().remaining, FADE_TICKS - 3);

    assert_eq!(cl.tick_at(0.0).unwrap(), TickOutcome::Voice(VoiceTransition::Attack));
    assert!(cl.fade().is_none());
    assert_eq!(cl.voice().generation(), 2);
    assert_eq!(cl.tick_at(0.0).unwrap(), TickOutcome::Idle);
}

#[test]
fn sensor_failure_propagates() {
    let mut cl = make_loop();
    cl.sensor_mut().push_reading(30.0);
    cl.sensor_mut().fail_next_read = true;
    match cl.tick_at(0.0) {
        Err(SwellError::Sensor(msg)) => assert!(msg.contains("nack")),
        other => panic!("expected sensor error, got {other:?}"),
    }
}

#[test]
fn synth_failure_propagates_before_the_frame_is_shown() {
    let config = SwellConfig::default();
    let bank = RecordingBank {
        fail_updates: true,
        ..RecordingBank::default()
    };
    let mut cl = ControlLoop::new(
        &config,
        ScriptedSensor::default(),
        bank,
        MemoryStrip::new(config.num_pixels),
    )
    .unwrap();
    cl.sensor_mut().push_reading(30.0);
    cl.sensor_mut().push_reading(40.0);
    cl.tick_at(0.0).unwrap();

    match cl.tick_at(0.05) {
        Err(SwellError::Audio(msg)) => assert!(msg.contains("unplugged")),
        other => panic!("expected audio error, got {other:?}"),
    }
    assert_eq!(cl.strip().shows, 1);
}

#[test]
fn construction_rejects_bad_config_and_mismatched_strip() {
    let bad = SwellConfig {
        min_cm: 90.0,
        max_cm: 10.0,
        ..SwellConfig::default()
    };
    let err = ControlLoop::new(
        &bad,
        ScriptedSensor::default(),
        RecordingBank::default(),
        MemoryStrip::new(NUM_PIXELS),
    )
    .err()
    .expect("inverted range must be rejected");
    assert!(matches!(
        err,
        SwellError::Config(ConfigError::EmptyDistanceRange { .. })
    ));

    let err = ControlLoop::new(
        &SwellConfig::default(),
        ScriptedSensor::default(),
        RecordingBank::default(),
        MemoryStrip::new(10),
    )
    .err()
    .expect("pixel count mismatch must be rejected");
    assert!(matches!(err, SwellError::Strip(_)));
}
