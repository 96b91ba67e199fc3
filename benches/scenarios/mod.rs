mod engine;

pub use engine::{bench_decoder, bench_engine};
