//! Whole-engine scenarios: sustained chords through the full render path
//! and raw MIDI decoding throughput.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};
use polywave::{EngineConfig, SynthEngine};

use crate::BLOCK_SIZES;

fn chord_engine(max_voices: usize) -> SynthEngine {
    let mut engine = SynthEngine::new(EngineConfig {
        sample_rate: 44_100,
        max_voices,
        ..EngineConfig::default()
    });
    for &note in [48u8, 52, 55, 60, 64, 67, 71, 72].iter().take(max_voices) {
        for byte in [0x90, note, 100] {
            engine.process_midi_byte(byte);
        }
    }
    // Move past the attack transient so blocks are steady-state
    let mut warmup = vec![0.0f32; 512 * 2];
    for _ in 0..16 {
        engine.render(&mut warmup);
    }
    engine
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        for voices in [4usize, 8] {
            let mut engine = chord_engine(voices);
            let mut out = vec![0.0f32; size * 2];
            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{voices}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        engine.render(black_box(&mut out));
                    })
                },
            );
        }
    }

    group.finish();
}

pub fn bench_decoder(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/decoder");

    // A dense controller sweep with running status and clock bytes mixed in
    let mut stream = Vec::new();
    stream.extend_from_slice(&[0x90, 60, 100, 64, 100, 67, 100]);
    for value in 0..64u8 {
        stream.extend_from_slice(&[0xB0, 20, value * 2, 0xF8]);
        stream.extend_from_slice(&[0xE0, value, 64]);
    }
    stream.extend_from_slice(&[0x80, 60, 0, 64, 0, 67, 0]);

    group.throughput(Throughput::Bytes(stream.len() as u64));
    group.bench_function("mixed_stream", |b| {
        let mut engine = chord_engine(8);
        b.iter(|| {
            for &byte in &stream {
                engine.process_midi_byte(black_box(byte));
            }
        })
    });

    group.finish();
}
