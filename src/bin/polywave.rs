//! polywave - desktop demo host.
//!
//! Run with: cargo run --features demo
//!
//! Opens the default PCM output through cpal, loads program 1 from the
//! `patches/` directory (defaults if absent), and plays a looping arpeggio
//! by pushing raw MIDI bytes through the cross-thread queue - the same
//! byte path a hardware MIDI source would use.

use std::thread;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use polywave::io::{midi_byte_queue, MidiByteProducer};
use polywave::patch::storage::{FilesystemProgramStorage, ProgramStorage};
use polywave::{EngineConfig, SynthEngine, MAX_BLOCK_SIZE};

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device.default_output_config()?;

    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(eyre!("demo currently supports only f32 output"));
    }
    if config.channels() != 2 {
        return Err(eyre!("demo expects a stereo output device"));
    }

    let sample_rate = config.sample_rate().0;
    let mut engine = SynthEngine::new(EngineConfig {
        sample_rate,
        ..EngineConfig::default()
    });

    // Storage IO happens here, before the stream starts - never in the callback
    let mut storage = FilesystemProgramStorage::default();
    match storage.load(1, engine.voices_mut()) {
        Ok(true) => tracing::info!("program 1 loaded"),
        Ok(false) => tracing::info!("program 1 not found, playing defaults"),
        Err(err) => tracing::warn!("program 1 unreadable ({err}), keeping defaults"),
    }

    let (mut tx, mut rx) = midi_byte_queue(1024);
    let mut block = vec![0.0f32; MAX_BLOCK_SIZE * 2];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            // Drain pending MIDI first so the whole period hears it
            rx.drain(|byte| engine.process_midi_byte(byte));

            let mut written = 0;
            while written < data.len() {
                let chunk = (data.len() - written).min(MAX_BLOCK_SIZE * 2);
                let out = &mut block[..chunk];
                engine.render(out);
                data[written..written + chunk].copy_from_slice(out);
                written += chunk;
            }
        },
        |err| tracing::error!("stream error: {err}"),
        None,
    )?;

    stream.play()?;
    println!("Playing a looping C-minor arpeggio (Ctrl+C to stop).");

    play_arpeggio(&mut tx);

    Ok(())
}

fn play_arpeggio(tx: &mut MidiByteProducer) {
    let notes = [48u8, 60, 63, 67, 72, 67, 63, 60]; // C2 then C4-Eb4-G4-C5 and back
    let note_duration = Duration::from_millis(220);
    let gap = Duration::from_millis(30);

    loop {
        for &note in &notes {
            tx.push_all(&[0x90, note, 100]);
            thread::sleep(note_duration);

            // Note-on with velocity 0: running status keeps the stream short
            tx.push_all(&[note, 0]);
            thread::sleep(gap);
        }
    }
}
