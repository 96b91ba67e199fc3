//! Benchmarks for the wavetable oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polywave::dsp::oscillator::WavetableOscillator;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut osc = WavetableOscillator::new(44_100.0);
        let mut buffer = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("next_sample", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.next_sample(black_box(440.0));
                }
                black_box(&buffer);
            })
        });
    }

    // Table regeneration is the cost of a timbre change
    let mut osc = WavetableOscillator::new(44_100.0);
    group.bench_function("update_wavetable", |b| {
        b.iter(|| osc.update_wavetable(black_box(0.37)))
    });

    group.finish();
}
