//! Program (preset) data and the storage seam.
//!
//! A [`Program`] is the serializable slice of a voice's parameters: the
//! timbre knobs worth keeping, none of the transient playing state. The
//! persisted form is a flat JSON object; missing keys fall back to the
//! field defaults and unknown keys are ignored, so programs saved by
//! older or newer builds keep loading.

pub mod storage;

use serde::{Deserialize, Serialize};

use crate::dsp::filter::FilterMode;
use crate::synth::{Voice, VoiceAllocator, WavetableVoice};

/// A stored preset. Field names are the wire format.
///
/// `filter_mode` stays an integer (0..4 = lowpass, highpass, bandpass,
/// notch, allpass) in the persisted form; [`FilterMode`] round-trips
/// through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Program {
    pub waveform_shape: f32,
    pub base_cutoff: f32,
    pub filter_q: f32,
    pub filter_mode: i32,
    pub filter_env_amount: f32,
    pub filter_env_attack: f32,
    pub filter_env_decay: f32,
    pub filter_env_sustain: f32,
    pub filter_env_release: f32,
}

impl Default for Program {
    fn default() -> Self {
        Self {
            waveform_shape: 0.0,
            base_cutoff: 1000.0,
            filter_q: 0.707,
            filter_mode: 0,
            filter_env_amount: 0.5,
            filter_env_attack: 0.005,
            filter_env_decay: 0.2,
            filter_env_sustain: 0.3,
            filter_env_release: 0.1,
        }
    }
}

impl Program {
    /// Apply this program to every voice in the pool.
    pub fn apply_to<V: ProgramVoice>(&self, voices: &mut VoiceAllocator<V>) {
        voices.for_each(|voice| voice.apply_program(self));
    }

    /// Capture the current settings from the pool.
    ///
    /// Programs are broadcast, so any voice carries the full picture; the
    /// first one is read.
    pub fn capture_from<V: ProgramVoice>(voices: &mut VoiceAllocator<V>) -> Self {
        let mut captured = None;
        voices.for_each(|voice| {
            if captured.is_none() {
                captured = Some(voice.capture_program());
            }
        });
        captured.unwrap_or_default()
    }
}

/// Voices that expose the program parameter surface.
pub trait ProgramVoice: Voice {
    fn apply_program(&mut self, program: &Program);
    fn capture_program(&self) -> Program;
}

impl ProgramVoice for WavetableVoice {
    fn apply_program(&mut self, program: &Program) {
        self.set_shape(program.waveform_shape);
        self.set_base_cutoff(program.base_cutoff);
        self.set_filter_q(program.filter_q);
        self.set_filter_mode(FilterMode::from_index(program.filter_mode));
        self.set_filter_env_amount(program.filter_env_amount);
        self.filter_envelope_mut().set_parameters(
            program.filter_env_attack,
            program.filter_env_decay,
            program.filter_env_sustain,
            program.filter_env_release,
        );
    }

    fn capture_program(&self) -> Program {
        Program {
            waveform_shape: self.shape(),
            base_cutoff: self.base_cutoff(),
            filter_q: self.filter_q(),
            filter_mode: self.filter_mode().to_index(),
            filter_env_amount: self.filter_env_amount(),
            filter_env_attack: self.filter_envelope().attack_time(),
            filter_env_decay: self.filter_envelope().decay_time(),
            filter_env_sustain: self.filter_envelope().sustain_level(),
            filter_env_release: self.filter_envelope().release_time(),
        }
    }
}
