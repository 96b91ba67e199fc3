//! Wait-free SPSC queue for raw MIDI bytes.
//!
//! MIDI bytes may originate on another thread (a serial reader, a key
//! scanner task) while all decoder and voice state belongs to the audio
//! thread. This queue is the one legal crossing: the producer pushes
//! bytes as they arrive, the audio thread drains everything at the top of
//! each block and feeds the decoder.
//!
//! Both sides are wait-free; a full queue drops bytes at the producer
//! rather than ever stalling the consumer.

use rtrb::{Consumer, Producer, RingBuffer};

/// Create a queue holding up to `capacity` undrained bytes.
pub fn midi_byte_queue(capacity: usize) -> (MidiByteProducer, MidiByteConsumer) {
    let (producer, consumer) = RingBuffer::new(capacity);
    (
        MidiByteProducer { inner: producer },
        MidiByteConsumer { inner: consumer },
    )
}

/// Writing side, owned by the MIDI source thread.
pub struct MidiByteProducer {
    inner: Producer<u8>,
}

impl MidiByteProducer {
    /// Push one byte. Returns false (dropping the byte) when the queue is
    /// full - the consumer is never blocked on.
    pub fn push(&mut self, byte: u8) -> bool {
        self.inner.push(byte).is_ok()
    }

    /// Push a whole message, e.g. `[0x90, 60, 100]`. Returns the number of
    /// bytes accepted; on overflow the tail is dropped.
    pub fn push_all(&mut self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in bytes {
            if !self.push(byte) {
                break;
            }
            accepted += 1;
        }
        accepted
    }
}

/// Draining side, owned by the audio thread.
pub struct MidiByteConsumer {
    inner: Consumer<u8>,
}

impl MidiByteConsumer {
    /// Drain every pending byte into `f`, in arrival order. Wait-free.
    pub fn drain(&mut self, mut f: impl FnMut(u8)) -> usize {
        let mut drained = 0;
        while let Ok(byte) = self.inner.pop() {
            f(byte);
            drained += 1;
        }
        drained
    }
}
