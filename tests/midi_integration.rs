//! End-to-end byte-stream scenarios: raw MIDI in, voice/output state out.
//!
//! Each test drives the full engine (decoder → allocator → voices) exactly
//! the way a platform MIDI source would, one byte at a time.

use polywave::dsp::EnvelopePhase;
use polywave::synth::Voice;
use polywave::{EngineConfig, SynthEngine};

fn engine_with_voices(max_voices: usize) -> SynthEngine {
    SynthEngine::new(EngineConfig {
        sample_rate: 44_100,
        max_voices,
        ..EngineConfig::default()
    })
}

fn feed(engine: &mut SynthEngine, bytes: &[u8]) {
    for &byte in bytes {
        engine.process_midi_byte(byte);
    }
}

fn render_samples(engine: &mut SynthEngine, samples: usize) {
    let mut out = vec![0.0; 512 * 2];
    let mut rendered = 0;
    while rendered < samples {
        engine.render(&mut out);
        rendered += 512;
    }
}

#[test]
fn single_note_lifecycle() {
    let mut engine = engine_with_voices(8);

    feed(&mut engine, &[0x90, 60, 100]);
    {
        let voice = engine
            .voices_mut()
            .find_allocated(60)
            .expect("note 60 must have a voice");
        assert!((voice.base_frequency() - 261.626).abs() < 1e-2);
        assert!((voice.volume() - 100.0 / 127.0).abs() < 1e-6);
        assert_eq!(voice.amp_envelope_phase(), EnvelopePhase::Attack);
    }

    // Attack 10ms + decay 50ms at 44.1kHz: well settled after 8192 samples
    render_samples(&mut engine, 8192);
    assert_eq!(
        engine
            .voices_mut()
            .find_allocated(60)
            .unwrap()
            .amp_envelope_phase(),
        EnvelopePhase::Sustain
    );

    feed(&mut engine, &[0x80, 60, 0]);
    assert_eq!(
        engine
            .voices_mut()
            .find_allocated(60)
            .unwrap()
            .amp_envelope_phase(),
        EnvelopePhase::Release
    );

    // Release 100ms ≈ 4410 samples
    render_samples(&mut engine, 8192);
    let voice = engine
        .voices_mut()
        .find_allocated(60)
        .expect("slot stays assigned through ring-out");
    assert_eq!(voice.amp_envelope_phase(), EnvelopePhase::Idle);
    assert!(!voice.is_active());
}

#[test]
fn chord_allocates_distinct_voices() {
    let mut engine = engine_with_voices(8);
    feed(&mut engine, &[0x90, 60, 100, 0x90, 64, 100, 0x90, 67, 100]);

    let voices = engine.voices_mut();
    let c = voices.find_allocated(60).unwrap().base_frequency();
    let e = voices.find_allocated(64).unwrap().base_frequency();
    let g = voices.find_allocated(67).unwrap().base_frequency();
    assert!((c - 261.6).abs() < 0.1);
    assert!((e - 329.6).abs() < 0.1);
    assert!((g - 392.0).abs() < 0.1);

    let mut visited = 0;
    voices.for_each(|_| visited += 1);
    assert_eq!(visited, 8, "for_each visits the whole pool");
}

#[test]
fn overflow_steals_within_a_two_voice_pool() {
    let mut engine = engine_with_voices(2);
    feed(&mut engine, &[0x90, 60, 100, 0x90, 64, 100, 0x90, 67, 100]);

    let voices = engine.voices_mut();
    assert_eq!(voices.max_voices(), 2);

    // The stolen note is gone; survivors map to their own voices
    assert!(voices.find_allocated(64).is_none());
    let kept = voices.find_allocated(60).unwrap().base_frequency();
    assert!((kept - 261.6).abs() < 0.1);
    let stolen = voices.find_allocated(67).unwrap();
    assert!((stolen.base_frequency() - 392.0).abs() < 0.1);
    assert_eq!(stolen.amp_envelope_phase(), EnvelopePhase::Attack);
}

#[test]
fn note_off_after_steal_does_not_touch_the_new_owner() {
    let mut engine = engine_with_voices(2);
    feed(&mut engine, &[0x90, 60, 100, 0x90, 64, 100, 0x90, 67, 100]);

    // Late note-off for the stolen note 64
    feed(&mut engine, &[0x80, 64, 0]);

    let voices = engine.voices_mut();
    assert_eq!(
        voices.find_allocated(67).unwrap().amp_envelope_phase(),
        EnvelopePhase::Attack,
        "the reassigned voice must not be released"
    );
}

#[test]
fn wrong_channel_note_is_ignored() {
    let mut engine = engine_with_voices(8);
    feed(&mut engine, &[0x91, 60, 100]);

    let voices = engine.voices_mut();
    assert!(voices.find_allocated(60).is_none());
    let mut any_active = false;
    voices.for_each(|v| any_active |= v.is_active());
    assert!(!any_active);
}

#[test]
fn pitch_bend_center_reaches_every_voice_as_zero() {
    let mut engine = engine_with_voices(8);
    feed(&mut engine, &[0xE0, 0, 64]);

    engine
        .voices_mut()
        .for_each(|voice| assert_eq!(voice.pitch_bend(), 0.0));
}

#[test]
fn cutoff_cc_full_scale_sets_ten_kilohertz_everywhere() {
    let mut engine = engine_with_voices(8);
    feed(&mut engine, &[0xB0, 20, 127]);

    engine
        .voices_mut()
        .for_each(|voice| assert!((voice.base_cutoff() - 10_000.0).abs() < 0.5));
}

#[test]
fn running_status_chord_is_equivalent_to_explicit_statuses() {
    let mut engine = engine_with_voices(8);
    feed(&mut engine, &[0x90, 60, 100, 64, 100, 67, 100]);

    let voices = engine.voices_mut();
    assert!(voices.find_allocated(60).is_some());
    assert!(voices.find_allocated(64).is_some());
    assert!(voices.find_allocated(67).is_some());
}

#[test]
fn realtime_clock_does_not_break_a_note_stream() {
    let mut engine = engine_with_voices(8);
    // Clock ticks sprayed across a note-on, including mid-message
    feed(&mut engine, &[0xF8, 0x90, 0xF8, 60, 0xF8, 100, 0xF8]);

    assert!(engine.voices_mut().find_allocated(60).is_some());
}

#[test]
fn silence_when_no_amplitude_envelope_is_running() {
    let mut engine = engine_with_voices(8);
    // A full note lifecycle, fully rung out
    feed(&mut engine, &[0x90, 60, 100]);
    render_samples(&mut engine, 2048);
    feed(&mut engine, &[0x80, 60, 0]);
    render_samples(&mut engine, 16_384);

    let mut out = vec![1.0; 512 * 2];
    engine.render(&mut out);
    assert!(out.iter().all(|&s| s == 0.0));
}

#[test]
fn allocations_never_exceed_note_ons() {
    let mut engine = engine_with_voices(8);
    // 2 wrong-channel notes, 1 malformed partial, 3 good notes, 1 vel-0
    feed(
        &mut engine,
        &[
            0x91, 50, 100, // wrong channel
            0x92, 51, 100, // wrong channel
            0x90, 52, // partial, discarded by next status
            0x90, 60, 100, 0x90, 64, 100, 0x90, 67, 100, // good
            0x90, 70, 0, // velocity 0 = note off, no allocation
        ],
    );

    let voices = engine.voices_mut();
    let mut active = 0;
    voices.for_each(|v| {
        if v.is_active() {
            active += 1;
        }
    });
    assert_eq!(active, 3, "exactly the complete, in-channel note-ons allocate");
    assert!(voices.find_allocated(52).is_none());
    assert!(voices.find_allocated(70).is_none());
}
