/*
Biquad Filter Implementation
============================

A filter shapes the frequency content of a sound - it's how we carve
brightness, warmth, and character from raw waveforms. This implementation is
a classic 2nd-order IIR ("biquad") with coefficients from Robert
Bristow-Johnson's audio EQ cookbook, realized in Direct Form II Transposed.

Vocabulary
----------

  cutoff      The frequency (in Hz) where the filter starts to act.
              Clamped to [20 Hz, 0.99 × Nyquist].

  Q           Quality factor. 0.707 = Butterworth (maximally flat);
              higher values ring at the cutoff. Clamped to [0.1, 20].

  ω₀          Normalized angular frequency: 2π × cutoff / sample_rate.

  α (alpha)   Bandwidth term: sin(ω₀) / (2Q). Appears in every cookbook
              formula.

  b0..b2,     Feedforward and feedback coefficients, normalized by a0 so
  a1, a2      the difference equation needs no division.

  z1, z2      The two delay-line state variables of the transposed form.

Filter Responses
----------------

| Mode     | Passes         | Rejects       | Character                 |
|----------|----------------|---------------|---------------------------|
| Lowpass  | below cutoff   | above cutoff  | warm, muffled             |
| Highpass | above cutoff   | below cutoff  | thin, bright              |
| Bandpass | around cutoff  | both extremes | nasal, focused            |
| Notch    | both extremes  | around cutoff | hollow, phaser-like       |
| Allpass  | everything     | nothing       | phase shift only          |

The Topology: Direct Form II Transposed
---------------------------------------

Two state variables, good numerical behavior at audio cutoffs and Qs:

    y  = b0·x + z1
    z1 = b1·x − a1·y + z2
    z2 = b2·x − a2·y

Lazy Coefficients
-----------------

Recomputing cos/sin on every parameter write would be wasteful: the filter
envelope rewrites the cutoff every sample while it is moving. Instead, any
parameter change just sets a dirty flag, and process_sample() recomputes
once before filtering the next input.

At very low cutoff/Q the feedback path can settle into subnormal floats,
which are slow on most CPUs; state values below a tiny threshold are
flushed to zero.
*/

use std::f32::consts::TAU;

/// Filter response selector, in the order exposed to program storage
/// (`filterMode` 0..4) and cycled by the mode-change control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Lowpass,
    Highpass,
    Bandpass,
    Notch,
    Allpass,
}

impl FilterMode {
    /// Next mode in cycling order, wrapping from Allpass back to Lowpass.
    pub fn next(self) -> Self {
        match self {
            FilterMode::Lowpass => FilterMode::Highpass,
            FilterMode::Highpass => FilterMode::Bandpass,
            FilterMode::Bandpass => FilterMode::Notch,
            FilterMode::Notch => FilterMode::Allpass,
            FilterMode::Allpass => FilterMode::Lowpass,
        }
    }

    /// Integer tag used by the persisted program format.
    pub fn to_index(self) -> i32 {
        match self {
            FilterMode::Lowpass => 0,
            FilterMode::Highpass => 1,
            FilterMode::Bandpass => 2,
            FilterMode::Notch => 3,
            FilterMode::Allpass => 4,
        }
    }

    /// Inverse of [`to_index`](Self::to_index); out-of-range tags fall back
    /// to Lowpass.
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => FilterMode::Highpass,
            2 => FilterMode::Bandpass,
            3 => FilterMode::Notch,
            4 => FilterMode::Allpass,
            _ => FilterMode::Lowpass,
        }
    }
}

// Below this magnitude the delay-line state is flushed to zero to keep the
// feedback path out of the subnormal range.
const DENORMAL_THRESHOLD: f32 = 1.0e-20;

/// RBJ biquad with lazy coefficient recomputation.
pub struct BiquadFilter {
    sample_rate: f32,

    mode: FilterMode,
    cutoff_hz: f32,
    q: f32,

    // Normalized coefficients
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    // Delay line (Direct Form II Transposed)
    z1: f32,
    z2: f32,

    coeffs_dirty: bool,
}

impl BiquadFilter {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            mode: FilterMode::Lowpass,
            cutoff_hz: 1000.0,
            q: 0.707,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
            coeffs_dirty: true,
        };
        filter.update_coefficients();
        filter
    }

    pub fn set_mode(&mut self, mode: FilterMode) {
        if self.mode != mode {
            self.mode = mode;
            self.coeffs_dirty = true;
        }
    }

    /// Set cutoff frequency in Hz, clamped to [20, 0.99 × Nyquist].
    #[inline]
    pub fn set_cutoff(&mut self, frequency_hz: f32) {
        let nyquist = self.sample_rate * 0.5;
        let frequency_hz = frequency_hz.clamp(20.0, nyquist * 0.99);

        if self.cutoff_hz != frequency_hz {
            self.cutoff_hz = frequency_hz;
            self.coeffs_dirty = true;
        }
    }

    /// Set Q factor, clamped to [0.1, 20].
    #[inline]
    pub fn set_q(&mut self, q: f32) {
        let q = q.clamp(0.1, 20.0);

        if self.q != q {
            self.q = q;
            self.coeffs_dirty = true;
        }
    }

    /// Filter one sample. Recomputes coefficients first if a parameter
    /// changed since the last call.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        if self.coeffs_dirty {
            self.update_coefficients();
        }

        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;

        // Flush subnormals out of the feedback path
        if self.z1.abs() < DENORMAL_THRESHOLD {
            self.z1 = 0.0;
        }
        if self.z2.abs() < DENORMAL_THRESHOLD {
            self.z2 = 0.0;
        }

        output
    }

    /// Clear the delay line. Call when starting a new note to avoid clicks
    /// from stale state.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// RBJ cookbook coefficients for the current (mode, cutoff, Q),
    /// normalized by a0. Only called when a parameter changed.
    fn update_coefficients(&mut self) {
        let w0 = TAU * self.cutoff_hz / self.sample_rate;
        let cos_w0 = w0.cos();
        let sin_w0 = w0.sin();
        let alpha = sin_w0 / (2.0 * self.q);

        let (b0, b1, b2) = match self.mode {
            FilterMode::Lowpass => {
                let b1 = 1.0 - cos_w0;
                (b1 / 2.0, b1, b1 / 2.0)
            }
            FilterMode::Highpass => {
                let b1 = -(1.0 + cos_w0);
                (-b1 / 2.0, b1, -b1 / 2.0)
            }
            FilterMode::Bandpass => (alpha, 0.0, -alpha),
            FilterMode::Notch => (1.0, -2.0 * cos_w0, 1.0),
            FilterMode::Allpass => (1.0 - alpha, -2.0 * cos_w0, 1.0 + alpha),
        };
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha;

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;

        self.coeffs_dirty = false;
    }
}
