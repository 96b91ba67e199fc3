//! Benchmarks for the ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polywave::dsp::envelope::AdsrEnvelope;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut env = AdsrEnvelope::new(44_100.0);
        env.set_parameters(0.01, 0.1, 0.7, 0.3);
        env.trigger();
        group.bench_with_input(BenchmarkId::new("next_sample", size), &size, |b, _| {
            b.iter(|| {
                for _ in 0..size {
                    black_box(env.next_sample());
                }
            })
        });
    }

    group.finish();
}
