/*
Wavetable Oscillator Implementation
===================================

An oscillator generates a repeating waveform - the raw material of synthesis.
Instead of evaluating a waveform function every sample, we precompute one
cycle into a table and scan it with a phase accumulator.

Vocabulary
----------

  φ (phi)     Normalized phase (0.0 to 1.0). "Where we are" in the cycle;
              one complete cycle = 1.0.

  phase_inc   How much φ advances per sample:

              phase_inc = frequency / sample_rate

  wavetable   One cycle of the waveform sampled at TABLE_SIZE points.
              Reading a sample is one multiply, one table lookup, and one
              linear interpolation - no transcendentals in the hot path.

  shape       Morph parameter (0.0 to 1.0) blending between base waveforms:

              0.0 ──── 0.5 ──── 1.0
              saw    triangle  square

The Core Loop
-------------

Every sample, we:
  1. Read the table at φ × TABLE_SIZE, interpolating between neighbors
  2. Advance φ by phase_inc
  3. Wrap φ back below 1.0 when it completes a cycle

Base Waveforms
--------------

All three are defined over t = i / TABLE_SIZE ∈ [0, 1):

SAWTOOTH: 2t − 1

    +1 │      ╱│      ╱│
     0 │──╱────│──╱────│
    -1 │╱      │╱      │
       └─────────────────→ t

TRIANGLE: 4t − 1 for t < ½, then 3 − 4t

    +1 │    ╱╲
     0 │──╱────╲────╱──
    -1 │╱        ╲╱
       └─────────────────→ t

SQUARE: +1 for t < ½, −1 otherwise

    +1 │ ████      ████
     0 │─█──█──────█──█─
    -1 │    ██████
       └─────────────────→ t

Morphing
--------

For shape < 0.5 we crossfade saw → triangle with α = 2·shape; above 0.5 we
crossfade triangle → square with α = 2·(shape − 0.5). Regeneration walks the
whole table once (a bounded 256-iteration loop), so it happens on timbre
changes - never per sample.
*/

/// Number of samples in one wavetable cycle.
pub const TABLE_SIZE: usize = 256;

/// Wavetable oscillator with runtime-morphable waveform.
///
/// The table is regenerated by [`update_wavetable`](Self::update_wavetable)
/// when the timbre changes and scanned by a normalized phase accumulator.
pub struct WavetableOscillator {
    table: [f32; TABLE_SIZE],
    phase: f32,
    shape: f32,
    sample_rate: f32,
}

impl WavetableOscillator {
    /// Create an oscillator producing a pure sawtooth (shape 0.0).
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            table: [0.0; TABLE_SIZE],
            phase: 0.0,
            shape: 0.0,
            sample_rate,
        };
        osc.update_wavetable(0.0);
        osc
    }

    /// Regenerate the wavetable from the morph parameter.
    ///
    /// `shape` is clamped to [0, 1]: 0.0 = sawtooth, 0.5 = triangle,
    /// 1.0 = square. Call on timbre changes, not per sample.
    pub fn update_wavetable(&mut self, shape: f32) {
        let shape = shape.clamp(0.0, 1.0);
        self.shape = shape;

        for (i, slot) in self.table.iter_mut().enumerate() {
            let t = i as f32 / TABLE_SIZE as f32;

            let saw = 2.0 * t - 1.0;
            let triangle = if t < 0.5 { 4.0 * t - 1.0 } else { 3.0 - 4.0 * t };
            let square = if t < 0.5 { 1.0 } else { -1.0 };

            *slot = if shape < 0.5 {
                // Crossfade sawtooth → triangle
                let blend = shape * 2.0;
                saw * (1.0 - blend) + triangle * blend
            } else {
                // Crossfade triangle → square
                let blend = (shape - 0.5) * 2.0;
                triangle * (1.0 - blend) + square * blend
            };
        }
    }

    /// Generate the next sample at the given frequency.
    ///
    /// Returns a value in [-1.0, +1.0].
    #[inline]
    pub fn next_sample(&mut self, frequency: f32) -> f32 {
        // φ ∈ [0, 1) → table position
        let table_pos = self.phase * TABLE_SIZE as f32;
        let index0 = table_pos as usize % TABLE_SIZE;
        let index1 = (index0 + 1) % TABLE_SIZE;

        // Linear interpolation between adjacent table entries
        let frac = table_pos - table_pos.floor();
        let sample = self.table[index0] * (1.0 - frac) + self.table[index1] * frac;

        self.phase += frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }

    /// Reset phase to zero. Call on note trigger for a deterministic attack.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Current morph parameter, as last passed to `update_wavetable`.
    pub fn shape(&self) -> f32 {
        self.shape
    }

    /// Current normalized phase in [0, 1).
    pub fn phase(&self) -> f32 {
        self.phase
    }
}
