/*
Waveshaping Implementation
==========================

A waveshaper applies a memoryless transfer function to each sample, adding
harmonics. The output stage drives the mixed voice sum through one of three
shapers:

    output = f(input × gain)

Drive Mapping
-------------

The user-facing drive parameter is normalized [0, 1] and maps exponentially
onto the actual gain:

    gain = 0.1 × 100^drive

    0.0 → 0.1× (headroom)
    0.5 → 1.0× (unity)
    1.0 → 10×  (heavy saturation)

Transfer Functions
------------------

TANH SOFT CLIP: y = tanh(x × gain)

    Smooth, warm limiting. tanh naturally compresses to ±1 with a gentle
    knee - the classic "tube" curve.

    +1 │        ____________
       │      ╱
     0 │──╱─────────────────
       │╱
    -1 │____________
       └─────────────────────→ x·gain

WAVE FOLDER: peaks reflect off ±1 instead of clipping

    The signal is mapped onto a repeating triangle pattern, so material
    beyond the threshold folds back down. Rich, metallic harmonics -
    classic west-coast waveshaping.

    +1 │    ╱╲    ╱╲    ╱╲
       │   ╱  ╲  ╱  ╲  ╱
     0 │──╱────╲╱────╲╱─────
       │ ╱
    -1 │╱
       └─────────────────────→ x·gain

SOFT WAVE FOLDER: the same folding with tanh-rounded corners

    Folding as above, then the triangle peaks are smoothed with
    tanh(3y)/tanh(3). Warmer and less aggressive than the hard fold.
*/

/// Softness of the rounded fold corners in [`wavefold_soft`].
const FOLD_SOFTNESS: f32 = 3.0;

/// Map normalized drive [0, 1] to exponential gain [0.1, 10].
///
/// 0.5 is exactly unity.
#[inline]
pub fn drive_to_gain(drive: f32) -> f32 {
    let drive = drive.clamp(0.0, 1.0);
    0.1 * 100.0_f32.powf(drive)
}

/// Hyperbolic-tangent soft clip.
#[inline]
pub fn tanh_soft_clip(sample: f32, gain: f32) -> f32 {
    (sample * gain).tanh()
}

/// Hard wave folder: reflect the signal off ±1 as many times as needed.
#[inline]
pub fn wavefold(sample: f32, gain: f32) -> f32 {
    fold_unit(sample * gain)
}

/// Soft wave folder: hard fold, then smooth the triangle peaks with tanh.
#[inline]
pub fn wavefold_soft(sample: f32, gain: f32) -> f32 {
    let folded = fold_unit(sample * gain);
    (folded * FOLD_SOFTNESS).tanh() / FOLD_SOFTNESS.tanh()
}

/// Map x onto a repeating triangle over ±1.
///
/// Shift into [0, 2) with period 2, reflect the upper half, and shift back.
#[inline]
fn fold_unit(x: f32) -> f32 {
    let mut u = x * 0.5 + 0.5;
    u = u.rem_euclid(2.0);
    if u > 1.0 {
        u = 2.0 - u;
    }
    u * 2.0 - 1.0
}

/// Apply tanh soft clipping to a buffer in place.
pub fn tanh_soft_clip_buffer(buffer: &mut [f32], gain: f32) {
    for sample in buffer.iter_mut() {
        *sample = tanh_soft_clip(*sample, gain);
    }
}

/// Apply hard wave folding to a buffer in place.
pub fn wavefold_buffer(buffer: &mut [f32], gain: f32) {
    for sample in buffer.iter_mut() {
        *sample = wavefold(*sample, gain);
    }
}

/// Apply soft wave folding to a buffer in place.
pub fn wavefold_soft_buffer(buffer: &mut [f32], gain: f32) {
    for sample in buffer.iter_mut() {
        *sample = wavefold_soft(*sample, gain);
    }
}
