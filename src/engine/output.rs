/*
Output Stage
============

The last hop before the hardware. Each block:

  1. Sum every voice into a preallocated mono buffer (silent voices
     contribute exact zeros and cost one is_active check per sample).
  2. Drive the sum through the active waveshaper.
  3. Smooth the result with the post filter (lowpass 10 kHz, Q 0.707 by
     default) to tame the folding harmonics.
  4. Duplicate mono → interleaved stereo.

Parameter writes arrive from the control-change hook through
OutputControls, a handle of atomics shared with the stage. The stage reads
the handle once at the top of each block, so control traffic never locks
and never allocates, and every sample of a block sees one consistent
parameter set.

Switching the waveshaper resets the post filter: its delay line holds
state shaped by the previous transfer curve, and the mismatch is audible
as a click.
*/

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::dsp::filter::BiquadFilter;
use crate::dsp::waveshaper;
use crate::synth::{Voice, VoiceAllocator};
use crate::MAX_BLOCK_SIZE;

/// Selectable output waveshaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveshaperMode {
    TanhSoftClip,
    HardWaveFolder,
    SoftWaveFolder,
}

impl WaveshaperMode {
    /// Next mode in cycling order.
    pub fn next(self) -> Self {
        match self {
            WaveshaperMode::TanhSoftClip => WaveshaperMode::HardWaveFolder,
            WaveshaperMode::HardWaveFolder => WaveshaperMode::SoftWaveFolder,
            WaveshaperMode::SoftWaveFolder => WaveshaperMode::TanhSoftClip,
        }
    }

    /// Display name, e.g. for host UIs and logs.
    pub fn name(self) -> &'static str {
        match self {
            WaveshaperMode::TanhSoftClip => "TanhSoftClip",
            WaveshaperMode::HardWaveFolder => "HardWaveFolder",
            WaveshaperMode::SoftWaveFolder => "SoftWaveFolder",
        }
    }
}

#[derive(Debug)]
struct ControlState {
    drive_bits: AtomicU32,
    post_cutoff_bits: AtomicU32,
    post_q_bits: AtomicU32,
    /// Monotonic count of requested shaper switches.
    shaper_cycles: AtomicU32,
}

/// Cloneable, lock-free handle for writing output-stage parameters from
/// the control-change hook (or any other thread).
#[derive(Debug, Clone)]
pub struct OutputControls {
    state: Arc<ControlState>,
}

impl OutputControls {
    fn new() -> Self {
        Self {
            state: Arc::new(ControlState {
                drive_bits: AtomicU32::new(0.5_f32.to_bits()),
                post_cutoff_bits: AtomicU32::new(10_000.0_f32.to_bits()),
                post_q_bits: AtomicU32::new(0.707_f32.to_bits()),
                shaper_cycles: AtomicU32::new(0),
            }),
        }
    }

    /// Normalized drive [0, 1]; 0.5 is unity gain.
    pub fn set_drive(&self, drive: f32) {
        self.state
            .drive_bits
            .store(drive.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    pub fn drive(&self) -> f32 {
        f32::from_bits(self.state.drive_bits.load(Ordering::Relaxed))
    }

    pub fn set_post_filter_cutoff(&self, cutoff_hz: f32) {
        self.state
            .post_cutoff_bits
            .store(cutoff_hz.to_bits(), Ordering::Relaxed);
    }

    pub fn set_post_filter_q(&self, q: f32) {
        self.state.post_q_bits.store(q.to_bits(), Ordering::Relaxed);
    }

    /// Request a switch to the next waveshaper.
    pub fn cycle_waveshaper(&self) {
        self.state.shaper_cycles.fetch_add(1, Ordering::Relaxed);
    }
}

/// Mixes the voice pool and produces interleaved stereo frames.
pub struct OutputStage {
    shaper: WaveshaperMode,
    drive: f32,
    post_filter: BiquadFilter,
    mono: Vec<f32>,
    controls: OutputControls,
    applied_shaper_cycles: u32,
}

impl OutputStage {
    pub fn new(sample_rate: f32) -> Self {
        let mut post_filter = BiquadFilter::new(sample_rate);
        post_filter.set_cutoff(10_000.0);
        post_filter.set_q(0.707);

        Self {
            shaper: WaveshaperMode::TanhSoftClip,
            drive: 0.5,
            post_filter,
            mono: vec![0.0; MAX_BLOCK_SIZE],
            controls: OutputControls::new(),
            applied_shaper_cycles: 0,
        }
    }

    /// Handle for writing parameters from control code.
    pub fn controls(&self) -> OutputControls {
        self.controls.clone()
    }

    pub fn shaper(&self) -> WaveshaperMode {
        self.shaper
    }

    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Switch shapers directly (the control handle goes through
    /// [`OutputControls::cycle_waveshaper`]).
    pub fn set_shaper(&mut self, shaper: WaveshaperMode) {
        if self.shaper != shaper {
            self.shaper = shaper;
            // Stored state from the old transfer curve would click
            self.post_filter.reset();
        }
    }

    /// Render one block: sum `voices`, shape, post-filter, and write
    /// interleaved stereo into `out` (`out.len() / 2` frames).
    pub fn render<V: Voice>(&mut self, voices: &mut VoiceAllocator<V>, out: &mut [f32]) {
        debug_assert_eq!(out.len() % 2, 0, "output buffer must hold stereo frames");
        let frames = (out.len() / 2).min(self.mono.len());
        debug_assert!(
            out.len() / 2 <= MAX_BLOCK_SIZE,
            "block of {} frames exceeds MAX_BLOCK_SIZE {}",
            out.len() / 2,
            MAX_BLOCK_SIZE
        );

        self.apply_controls();

        let mono = &mut self.mono[..frames];
        mono.fill(0.0);
        voices.for_each(|voice| {
            for sample in mono.iter_mut() {
                *sample += voice.next_sample();
            }
        });

        let gain = waveshaper::drive_to_gain(self.drive);
        match self.shaper {
            WaveshaperMode::TanhSoftClip => waveshaper::tanh_soft_clip_buffer(mono, gain),
            WaveshaperMode::HardWaveFolder => waveshaper::wavefold_buffer(mono, gain),
            WaveshaperMode::SoftWaveFolder => waveshaper::wavefold_soft_buffer(mono, gain),
        }

        for sample in mono.iter_mut() {
            *sample = self.post_filter.process_sample(*sample);
        }

        for (frame, &sample) in self.mono[..frames].iter().enumerate() {
            out[frame * 2] = sample;
            out[frame * 2 + 1] = sample;
        }
    }

    /// Pull the latest parameter writes from the shared handle. Called once
    /// per block so all samples in a block agree.
    fn apply_controls(&mut self) {
        self.drive = self.controls.drive();
        self.post_filter
            .set_cutoff(f32::from_bits(self.controls.state.post_cutoff_bits.load(Ordering::Relaxed)));
        self.post_filter
            .set_q(f32::from_bits(self.controls.state.post_q_bits.load(Ordering::Relaxed)));

        let cycles = self.controls.state.shaper_cycles.load(Ordering::Relaxed);
        while self.applied_shaper_cycles != cycles {
            self.applied_shaper_cycles = self.applied_shaper_cycles.wrapping_add(1);
            let next = self.shaper.next();
            self.set_shaper(next);
        }
    }
}
