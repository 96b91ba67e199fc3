use crate::synth::voice::Voice;

/*
Voice Allocation
================

The allocator owns a fixed pool of voices and maps MIDI notes onto them.
The pool is built exactly once, from a factory closure, so no allocation
happens after construction - a hard requirement for the audio thread.

allocate(note) resolves in strict order:

  1. A slot already assigned to the note   → same voice (one voice per note)
  2. A slot never assigned to any note     → first such slot
  3. Steal:
     a. first assigned slot whose voice finished sounding, else
     b. round-robin from the slot after the last steal, so no single
        voice is starved.
     The stolen voice is release()d before reassignment; its old note's
     find_allocated() now returns None, so a late note-off for the old
     note cannot cut off the new one.

Slots stay assigned after note-off - the voice keeps ringing through its
release phase and remains findable (e.g. for a re-trigger of the same
note) until it is stolen.
*/

struct AllocationSlot<V> {
    voice: V,
    assigned_note: u8,
    is_allocated: bool,
}

/// Fixed-size pool of voices with note-based allocation and stealing.
pub struct VoiceAllocator<V: Voice> {
    slots: Vec<AllocationSlot<V>>,
    last_stolen: usize,
}

impl<V: Voice> VoiceAllocator<V> {
    /// Build the pool by invoking `factory` exactly `max_voices` times.
    pub fn new(max_voices: usize, mut factory: impl FnMut() -> V) -> Self {
        let slots = (0..max_voices)
            .map(|_| AllocationSlot {
                voice: factory(),
                assigned_note: 0,
                is_allocated: false,
            })
            .collect();

        Self {
            slots,
            last_stolen: 0,
        }
    }

    /// Number of voices in the pool; fixed for the allocator's lifetime.
    pub fn max_voices(&self) -> usize {
        self.slots.len()
    }

    /// Return the voice to trigger for `note`, allocating or stealing as
    /// needed. Never fails.
    pub fn allocate(&mut self, note: u8) -> &mut V {
        // Same note re-trigger collapses onto the existing voice
        if let Some(index) = self
            .slots
            .iter()
            .position(|slot| slot.is_allocated && slot.assigned_note == note)
        {
            return &mut self.slots[index].voice;
        }

        if let Some(index) = self.slots.iter().position(|slot| !slot.is_allocated) {
            let slot = &mut self.slots[index];
            slot.assigned_note = note;
            slot.is_allocated = true;
            return &mut slot.voice;
        }

        // Pool exhausted: prefer a voice that has finished sounding
        let index = self
            .slots
            .iter()
            .position(|slot| !slot.voice.is_active())
            .unwrap_or_else(|| (self.last_stolen + 1) % self.slots.len());
        self.last_stolen = index;

        let slot = &mut self.slots[index];
        // Clear envelope/filter state before handing the voice out
        slot.voice.release();
        slot.assigned_note = note;
        slot.is_allocated = true;
        &mut slot.voice
    }

    /// Voice currently assigned to `note`, if any.
    ///
    /// Note-off handling must use this rather than [`allocate`](Self::allocate)
    /// so a note whose voice was stolen becomes a no-op instead of releasing
    /// somebody else's voice.
    pub fn find_allocated(&mut self, note: u8) -> Option<&mut V> {
        self.slots
            .iter_mut()
            .find(|slot| slot.is_allocated && slot.assigned_note == note)
            .map(|slot| &mut slot.voice)
    }

    /// Apply `f` to every voice in the pool, in stable slot order. Used for
    /// broadcast parameter changes and audio rendering.
    pub fn for_each(&mut self, mut f: impl FnMut(&mut V)) {
        for slot in &mut self.slots {
            f(&mut slot.voice);
        }
    }
}
