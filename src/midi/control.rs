/*
Default Control-Change Mapping
==============================

MIDI leaves most controller numbers application-defined, so the decoder
hands control changes to a hook and stays mapping-free. This module is the
default hook: a translation table from controller numbers to synth
parameter writes.

| CC  | Parameter            | Scaling                      |
|-----|----------------------|------------------------------|
| 1   | waveform shape       | linear 0..1                  |
| 20  | filter cutoff        | exponential 100 Hz → 10 kHz  |
| 21  | filter Q             | linear 0.1 → 20              |
| 25  | filter env sustain   | linear 0..1                  |
| 63  | post-filter Q        | linear 0.1 → 20              |
| 70  | post-filter cutoff   | exponential 100 Hz → 20 kHz  |
| 71  | filter env attack    | linear 1 ms → 2 s            |
| 72  | filter env decay     | linear 10 ms → 5 s           |
| 73  | filter env release   | linear 10 ms → 5 s           |
| 74  | output drive         | linear 0..1                  |
| 96  | cycle filter mode    | rising edge (value > 63)     |
| 102 | cycle waveshaper     | rising edge (value > 63)     |

Cutoff scalings are exponential because pitch perception is: each step of
the controller multiplies the frequency, so the sweep feels even across
the range. Voice parameters broadcast through the allocator; output-stage
parameters go through the lock-free OutputControls handle.

The program-change hook only records the requested program number. Storage
IO stays off the render path; the embedder polls the request between
blocks and applies the loaded program there.
*/

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use crate::engine::output::OutputControls;
use crate::midi::Hooks;
use crate::synth::{VoiceAllocator, WavetableVoice};

pub const CC_WAVEFORM_SHAPE: u8 = 1;
pub const CC_FILTER_CUTOFF: u8 = 20;
pub const CC_FILTER_Q: u8 = 21;
pub const CC_FILTER_ENV_SUSTAIN: u8 = 25;
pub const CC_POST_FILTER_Q: u8 = 63;
pub const CC_POST_FILTER_CUTOFF: u8 = 70;
pub const CC_FILTER_ENV_ATTACK: u8 = 71;
pub const CC_FILTER_ENV_DECAY: u8 = 72;
pub const CC_FILTER_ENV_RELEASE: u8 = 73;
pub const CC_OUTPUT_DRIVE: u8 = 74;
pub const CC_CYCLE_FILTER_MODE: u8 = 96;
pub const CC_CYCLE_WAVESHAPER: u8 = 102;

/// Controller value as a normalized float in [0, 1].
#[inline]
pub fn normalized(value: u8) -> f32 {
    value as f32 / 127.0
}

/// Exponential sweep 100 Hz → 10 kHz for the voice filter cutoff.
#[inline]
pub fn cutoff_hz(value: u8) -> f32 {
    100.0 * 100.0_f32.powf(normalized(value))
}

/// Exponential sweep 100 Hz → 20 kHz for the post filter.
#[inline]
pub fn post_cutoff_hz(value: u8) -> f32 {
    100.0 * 200.0_f32.powf(normalized(value))
}

/// Linear sweep 0.1 → 20 for both Q controls.
#[inline]
pub fn q_factor(value: u8) -> f32 {
    0.1 + normalized(value) * 19.9
}

/// Linear 1 ms → 2 s.
#[inline]
pub fn attack_seconds(value: u8) -> f32 {
    0.001 + normalized(value) * 2.0
}

/// Linear 10 ms → 5 s, shared by decay and release.
#[inline]
pub fn decay_release_seconds(value: u8) -> f32 {
    0.01 + normalized(value) * 5.0
}

/// Momentary controllers act on the press half of the value range.
#[inline]
fn is_rising_edge(value: u8) -> bool {
    value > 63
}

/// Pending program-change request, shared between the decoder hook and the
/// embedder. The hook records the number; the embedder takes it outside
/// the render path and runs storage IO there.
#[derive(Debug, Clone, Default)]
pub struct ProgramRequest {
    // 0 = empty, else 0x100 | program
    slot: Arc<AtomicU16>,
}

impl ProgramRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request, replacing any not-yet-taken one.
    pub fn post(&self, program: u8) {
        self.slot.store(0x100 | program as u16, Ordering::Relaxed);
    }

    /// Take the most recent request, if any.
    pub fn take(&self) -> Option<u8> {
        let raw = self.slot.swap(0, Ordering::Relaxed);
        (raw != 0).then_some((raw & 0xFF) as u8)
    }
}

/// Build the default hook set for the wavetable voice.
///
/// `output` is the handle of the output stage the engine renders through;
/// `programs` receives program-change requests.
pub fn default_hooks(
    output: OutputControls,
    programs: ProgramRequest,
) -> Hooks<WavetableVoice> {
    Hooks {
        control_change: Box::new(move |_channel, cc, value, voices| {
            apply_control_change(cc, value, voices, &output);
        }),
        poly_aftertouch: Box::new(|_channel, _note, _pressure, _voice| {
            // TODO: map aftertouch pressure onto per-voice cutoff or vibrato depth
        }),
        program_change: Box::new(move |_channel, program, _voices| {
            programs.post(program);
        }),
        channel_pressure: Box::new(|_channel, _pressure, _voices| {}),
    }
}

fn apply_control_change(
    cc: u8,
    value: u8,
    voices: &mut VoiceAllocator<WavetableVoice>,
    output: &OutputControls,
) {
    match cc {
        CC_WAVEFORM_SHAPE => {
            let shape = normalized(value);
            voices.for_each(|voice| voice.set_shape(shape));
        }
        CC_FILTER_CUTOFF => {
            let cutoff = cutoff_hz(value);
            voices.for_each(|voice| voice.set_base_cutoff(cutoff));
        }
        CC_FILTER_Q => {
            let q = q_factor(value);
            voices.for_each(|voice| voice.set_filter_q(q));
        }
        CC_FILTER_ENV_SUSTAIN => {
            let sustain = normalized(value);
            voices.for_each(|voice| voice.filter_envelope_mut().set_sustain_level(sustain));
        }
        CC_FILTER_ENV_ATTACK => {
            let attack = attack_seconds(value);
            voices.for_each(|voice| voice.filter_envelope_mut().set_attack_time(attack));
        }
        CC_FILTER_ENV_DECAY => {
            let decay = decay_release_seconds(value);
            voices.for_each(|voice| voice.filter_envelope_mut().set_decay_time(decay));
        }
        CC_FILTER_ENV_RELEASE => {
            let release = decay_release_seconds(value);
            voices.for_each(|voice| voice.filter_envelope_mut().set_release_time(release));
        }
        CC_OUTPUT_DRIVE => {
            output.set_drive(normalized(value));
        }
        CC_POST_FILTER_CUTOFF => {
            output.set_post_filter_cutoff(post_cutoff_hz(value));
        }
        CC_POST_FILTER_Q => {
            output.set_post_filter_q(q_factor(value));
        }
        CC_CYCLE_FILTER_MODE => {
            if is_rising_edge(value) {
                // Advance every voice to the same mode: the first voice
                // picks the target, the rest follow
                let mut target = None;
                voices.for_each(|voice| {
                    let mode = *target.get_or_insert_with(|| voice.filter_mode().next());
                    voice.set_filter_mode(mode);
                });
            }
        }
        CC_CYCLE_WAVESHAPER => {
            if is_rising_edge(value) {
                output.cycle_waveshaper();
            }
        }
        _ => {
            // Unmapped controllers are ignored
        }
    }
}
