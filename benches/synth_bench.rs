//! Benchmarks for the DSP primitives and full-engine scenarios.
//!
//! Run with: cargo bench
//!
//! Reference deadlines at 44.1 kHz:
//!   - 64 samples  = 1.45ms
//!   - 128 samples = 2.90ms
//!   - 256 samples = 5.80ms
//!   - 512 samples = 11.6ms
//!
//! Benchmark groups:
//!   - dsp/*        Per-component hot loops (oscillator, filter, envelope,
//!                  waveshaper)
//!   - scenarios/*  Whole-engine rendering and MIDI decoding

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common audio block sizes.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    dsp::bench_oscillator,
    dsp::bench_filter,
    dsp::bench_envelope,
    dsp::bench_waveshaper,
    scenarios::bench_engine,
    scenarios::bench_decoder,
);
criterion_main!(benches);
