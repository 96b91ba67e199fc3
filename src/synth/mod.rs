// Purpose: voice composition and polyphonic voice management.
// This layer sits above the dsp primitives and below the MIDI decoder.

pub mod allocator;
pub mod voice;

pub use allocator::VoiceAllocator;
pub use voice::{Voice, WavetableVoice};
