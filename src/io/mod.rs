// Purpose: transport between the core and the outside world.
// The only thing that legitimately crosses threads is raw MIDI bytes.

pub mod queue;

pub use queue::{midi_byte_queue, MidiByteConsumer, MidiByteProducer};
