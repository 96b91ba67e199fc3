//! Low-level DSP primitives composed into voices by the synth layer.
//!
//! These components are allocation-free and realtime-safe, making them safe
//! to embed directly inside voice structs. They intentionally stay focused on
//! the signal-processing math so the voice and output layers can handle
//! orchestration and modulation.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// RBJ biquad filter with switchable response.
pub mod filter;
/// Morphable wavetable oscillator.
pub mod oscillator;
/// Memoryless nonlinear transfer functions for the output stage.
pub mod waveshaper;

pub use envelope::EnvelopePhase;
pub use filter::FilterMode;
