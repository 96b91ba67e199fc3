//! Core real-time engine of a polyphonic subtractive synthesizer.
//!
//! The crate turns a raw MIDI byte stream into interleaved stereo `f32`
//! frames. Four layers cooperate:
//!
//! ```text
//! bytes → [midi::StreamDecoder] → [synth::VoiceAllocator] ⇄ N × WavetableVoice
//!                                        │                        │ next_sample()
//!                                        └──────► [engine::OutputStage] → stereo f32
//! ```
//!
//! Everything the audio thread touches is allocated up front: the voice pool
//! is built once, the mix buffer is preallocated, and the hot path performs
//! no locking, no heap allocation, and no system calls. MIDI bytes produced
//! on another thread are handed over through the wait-free queue in
//! [`io::queue`].

pub mod dsp;
pub mod engine;
pub mod io;
pub mod midi;
pub mod patch;
pub mod synth;

pub use engine::SynthEngine;

/// Largest number of frames a single [`engine::OutputStage`] pass may render.
///
/// Hosts with larger hardware periods render in chunks of at most this many
/// frames (see the demo binary).
pub const MAX_BLOCK_SIZE: usize = 1024;

/// Construction-time configuration. Injected into every component that needs
/// the sample rate; nothing reads global state.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub max_voices: usize,
    /// MIDI channel (0..15) the decoder acts on.
    pub listen_channel: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            max_voices: 8,
            listen_channel: 0,
        }
    }
}
