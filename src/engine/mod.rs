//! Engine assembly: decoder + voice pool + output stage.
//!
//! [`SynthEngine`] is what an embedder drives: feed it MIDI bytes, ask it
//! for stereo blocks. Platform code (a PCM callback, an I²S task) stays on
//! the other side of those two calls.

pub mod output;

use tracing::info;

use crate::midi::control::{default_hooks, ProgramRequest};
use crate::midi::{Hooks, StreamDecoder};
use crate::patch::Program;
use crate::synth::{VoiceAllocator, WavetableVoice};
use crate::EngineConfig;

pub use output::{OutputControls, OutputStage};

/// The complete core: a voice pool, the MIDI decoder driving it, and the
/// output stage mixing it down.
///
/// Ownership is deliberately flat: the engine owns the allocator and the
/// decoder side by side, and the decoder borrows the allocator only for
/// the duration of each `process` call. Voices hold no back-references.
pub struct SynthEngine {
    config: EngineConfig,
    decoder: StreamDecoder<WavetableVoice>,
    voices: VoiceAllocator<WavetableVoice>,
    output: OutputStage,
    programs: ProgramRequest,
}

impl SynthEngine {
    /// Build an engine with the default control-change mapping.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_hooks(config, default_hooks)
    }

    /// Build an engine with a custom hook set.
    ///
    /// The closure receives the output-stage control handle and the
    /// program-request slot so custom hooks can reach both.
    pub fn with_hooks(
        config: EngineConfig,
        make_hooks: impl FnOnce(OutputControls, ProgramRequest) -> Hooks<WavetableVoice>,
    ) -> Self {
        let sample_rate = config.sample_rate as f32;

        info!(
            sample_rate = config.sample_rate,
            max_voices = config.max_voices,
            listen_channel = config.listen_channel,
            "initializing synthesizer engine"
        );

        let output = OutputStage::new(sample_rate);
        let programs = ProgramRequest::new();
        let hooks = make_hooks(output.controls(), programs.clone());

        Self {
            config,
            decoder: StreamDecoder::new(config.listen_channel, hooks),
            voices: VoiceAllocator::new(config.max_voices, || WavetableVoice::new(sample_rate)),
            output,
            programs,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Feed one byte of the MIDI stream.
    pub fn process_midi_byte(&mut self, byte: u8) {
        self.decoder.process(byte, &mut self.voices);
    }

    /// Render interleaved stereo frames into `out` (`out.len() / 2`
    /// frames, at most [`crate::MAX_BLOCK_SIZE`]).
    ///
    /// MIDI bytes processed before this call are heard by every sample of
    /// the block; there is no within-block event placement.
    pub fn render(&mut self, out: &mut [f32]) {
        self.output.render(&mut self.voices, out);
    }

    /// Program number requested by a decoded program-change message, if
    /// one arrived since the last call. Storage IO belongs on the caller's
    /// side of this boundary, never inside [`render`](Self::render).
    pub fn take_program_request(&self) -> Option<u8> {
        self.programs.take()
    }

    /// Apply a program to every voice.
    pub fn apply_program(&mut self, program: &Program) {
        program.apply_to(&mut self.voices);
    }

    /// Capture the current voice settings as a program.
    pub fn capture_program(&mut self) -> Program {
        Program::capture_from(&mut self.voices)
    }

    /// Handle for writing output-stage parameters directly.
    pub fn output_controls(&self) -> OutputControls {
        self.output.controls()
    }

    /// Cloneable handle to the program-request slot, for embedders polling
    /// from outside the audio callback.
    pub fn program_requests(&self) -> ProgramRequest {
        self.programs.clone()
    }

    /// Direct access to the voice pool, e.g. for broadcast parameter
    /// changes from embedder code.
    pub fn voices_mut(&mut self) -> &mut VoiceAllocator<WavetableVoice> {
        &mut self.voices
    }
}
