//! Benchmarks for the biquad filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polywave::dsp::filter::{BiquadFilter, FilterMode};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for mode in [FilterMode::Lowpass, FilterMode::Highpass, FilterMode::Bandpass] {
            let mut filter = BiquadFilter::new(44_100.0);
            filter.set_mode(mode);
            filter.set_cutoff(1_000.0);
            filter.set_q(2.0);
            let name = format!("{mode:?}").to_lowercase();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for &x in &input {
                        black_box(filter.process_sample(black_box(x)));
                    }
                })
            });
        }

        // Worst case for the lazy recompute: cutoff rewritten every sample,
        // the way the filter envelope does while it is moving
        let mut filter = BiquadFilter::new(44_100.0);
        group.bench_with_input(BenchmarkId::new("modulated_cutoff", size), &size, |b, _| {
            b.iter(|| {
                for (i, &x) in input.iter().enumerate() {
                    filter.set_cutoff(500.0 + i as f32);
                    black_box(filter.process_sample(black_box(x)));
                }
            })
        });
    }

    group.finish();
}
