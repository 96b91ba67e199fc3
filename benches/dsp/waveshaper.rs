//! Benchmarks for the output waveshapers.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polywave::dsp::waveshaper;

use crate::BLOCK_SIZES;

pub fn bench_waveshaper(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/waveshaper");
    let gain = waveshaper::drive_to_gain(0.8);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| ((i as f32 / size as f32) * 2.0 - 1.0) * 1.5)
            .collect();
        let mut buffer = input.clone();

        group.bench_with_input(BenchmarkId::new("tanh_soft_clip", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                waveshaper::tanh_soft_clip_buffer(black_box(&mut buffer), black_box(gain));
            })
        });

        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("wavefold", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                waveshaper::wavefold_buffer(black_box(&mut buffer), black_box(gain));
            })
        });

        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("wavefold_soft", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                waveshaper::wavefold_soft_buffer(black_box(&mut buffer), black_box(gain));
            })
        });
    }

    group.finish();
}
