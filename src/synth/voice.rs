use crate::dsp::envelope::{AdsrEnvelope, EnvelopePhase};
use crate::dsp::filter::{BiquadFilter, FilterMode};
use crate::dsp::oscillator::WavetableOscillator;

/// A monophonic synthesis unit playable by the voice allocator.
///
/// Implementations generate audio at a fundamental frequency and volume and
/// report whether they are still sounding. The allocator uses `is_active`
/// to prefer finished voices when stealing.
pub trait Voice: Send {
    /// Start a note. Envelope-carrying voices begin their attack phase and
    /// keep sounding until [`release`](Self::release).
    fn trigger(&mut self, frequency_hz: f32, volume: f32);

    /// Release the note. The voice may keep sounding while its envelope
    /// rings out; poll [`is_active`](Self::is_active) to find out when it
    /// has finished.
    fn release(&mut self);

    /// Update the frequency of the currently playing note.
    fn set_frequency(&mut self, frequency_hz: f32);

    /// Update the volume (0.0 to 1.0).
    fn set_volume(&mut self, volume: f32);

    /// Normalized pitch-bend offset in [-1, +1]; multiplied by the bend
    /// range to shift the playing frequency.
    fn set_pitch_bend(&mut self, amount: f32);

    /// Bend range in semitones (default 2).
    fn set_pitch_bend_range(&mut self, semitones: f32);

    /// True while the voice is producing sound.
    fn is_active(&self) -> bool;

    /// Generate the next sample in [-1.0, +1.0].
    fn next_sample(&mut self) -> f32;
}

/*
The subtractive voice: oscillator → filter → amplifier, with a dedicated
envelope modulating the filter cutoff upward:

                       ┌──────────────┐
    frequency ────────►│  wavetable   │
    (base × bend)      │  oscillator  │
                       └──────┬───────┘
                              ▼
                       ┌──────────────┐     ┌──────────────┐
    base cutoff ──────►│    biquad    │◄────│ filter ADSR  │
    × (1 + env·amt·9)  │    filter    │     └──────────────┘
                       └──────┬───────┘
                              ▼
                       ┌──────────────┐     ┌──────────────┐
    volume ───────────►│  amplifier   │◄────│  amp ADSR    │
                       └──────┬───────┘     └──────────────┘
                              ▼
                            sample

The filter-envelope modulation is upward-only with a ×9 factor, giving the
sweep up to 10× the base cutoff. The moving envelope rewrites the cutoff
every sample; the filter's dirty flag keeps the coefficient math to one
recompute per write.
*/

/// Wavetable voice: morphable oscillator, resonant biquad, and two ADSR
/// envelopes (amplitude and filter cutoff).
pub struct WavetableVoice {
    oscillator: WavetableOscillator,
    filter: BiquadFilter,
    amp_envelope: AdsrEnvelope,
    filter_envelope: AdsrEnvelope,

    base_frequency: f32,
    volume: f32,
    pitch_bend: f32,
    pitch_bend_range: f32,
    base_cutoff: f32,
    filter_env_amount: f32,
}

impl WavetableVoice {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter_envelope = AdsrEnvelope::new(sample_rate);
        filter_envelope.set_parameters(0.005, 0.2, 0.3, 0.1);

        Self {
            oscillator: WavetableOscillator::new(sample_rate),
            filter: BiquadFilter::new(sample_rate),
            amp_envelope: AdsrEnvelope::new(sample_rate),
            filter_envelope,
            base_frequency: 440.0,
            volume: 1.0,
            pitch_bend: 0.0,
            pitch_bend_range: 2.0,
            base_cutoff: 1000.0,
            filter_env_amount: 0.5,
        }
    }

    /// Regenerate the oscillator wavetable (0.0 saw → 0.5 triangle →
    /// 1.0 square).
    pub fn set_shape(&mut self, shape: f32) {
        self.oscillator.update_wavetable(shape);
    }

    pub fn shape(&self) -> f32 {
        self.oscillator.shape()
    }

    /// Filter cutoff before envelope modulation, in Hz.
    pub fn set_base_cutoff(&mut self, cutoff_hz: f32) {
        self.base_cutoff = cutoff_hz;
        self.filter.set_cutoff(cutoff_hz);
    }

    pub fn base_cutoff(&self) -> f32 {
        self.base_cutoff
    }

    pub fn set_filter_q(&mut self, q: f32) {
        self.filter.set_q(q);
    }

    pub fn filter_q(&self) -> f32 {
        self.filter.q()
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter.set_mode(mode);
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter.mode()
    }

    /// Depth of the upward cutoff sweep, clamped to [0, 1].
    pub fn set_filter_env_amount(&mut self, amount: f32) {
        self.filter_env_amount = amount.clamp(0.0, 1.0);
    }

    pub fn filter_env_amount(&self) -> f32 {
        self.filter_env_amount
    }

    pub fn filter_envelope_mut(&mut self) -> &mut AdsrEnvelope {
        &mut self.filter_envelope
    }

    pub fn filter_envelope(&self) -> &AdsrEnvelope {
        &self.filter_envelope
    }

    pub fn amp_envelope_phase(&self) -> EnvelopePhase {
        self.amp_envelope.phase()
    }

    pub fn base_frequency(&self) -> f32 {
        self.base_frequency
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn pitch_bend(&self) -> f32 {
        self.pitch_bend
    }

    pub fn pitch_bend_range(&self) -> f32 {
        self.pitch_bend_range
    }
}

impl Voice for WavetableVoice {
    fn trigger(&mut self, frequency_hz: f32, volume: f32) {
        self.base_frequency = frequency_hz;
        self.volume = volume;
        self.oscillator.reset();
        // Stale delay-line state from the previous note would click
        self.filter.reset();
        self.amp_envelope.trigger();
        self.filter_envelope.trigger();
    }

    fn release(&mut self) {
        self.amp_envelope.release();
        self.filter_envelope.release();
    }

    fn set_frequency(&mut self, frequency_hz: f32) {
        self.base_frequency = frequency_hz;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_pitch_bend(&mut self, amount: f32) {
        self.pitch_bend = amount.clamp(-1.0, 1.0);
    }

    fn set_pitch_bend_range(&mut self, semitones: f32) {
        self.pitch_bend_range = semitones;
    }

    fn is_active(&self) -> bool {
        self.amp_envelope.is_active()
    }

    #[inline]
    fn next_sample(&mut self) -> f32 {
        if !self.amp_envelope.is_active() {
            return 0.0;
        }

        let semitone_shift = self.pitch_bend * self.pitch_bend_range;
        let frequency = self.base_frequency * (semitone_shift / 12.0).exp2();

        let sample = self.oscillator.next_sample(frequency);

        // Upward-only cutoff sweep: amount 1.0 reaches 10× the base cutoff
        let filter_env_level = self.filter_envelope.next_sample();
        let modulated_cutoff =
            self.base_cutoff * (1.0 + filter_env_level * self.filter_env_amount * 9.0);
        self.filter.set_cutoff(modulated_cutoff);
        let sample = self.filter.process_sample(sample);

        let amp_level = self.amp_envelope.next_sample();
        sample * amp_level * self.volume
    }
}
