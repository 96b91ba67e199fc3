/*
MIDI Stream Decoding
====================

The decoder is a per-byte state machine. Devices do not send tidy
three-byte packets; they send a stream with three complications:

  running status   After a complete channel-voice message the status byte
                   stays armed. Following data bytes start another message
                   of the same command without repeating the status:

                     90 3C 64 40 64   →  NoteOn(60,100), NoteOn(64,100)

  real-time bytes  0xF8..0xFF (clock, start, stop, ...) may appear ANYWHERE,
                   including between the two data bytes of another message.
                   They must pass through without touching decoder state:

                     90 3C F8 64      →  NoteOn(60,100), one clock tick

  interruption     A new status byte in the middle of a partial message
                   discards the partial message. System-common bytes
                   (0xF0..0xF7) additionally clear the running status, so
                   data bytes inside a SysEx block are ignored.

State is four fields: the armed status (command + channel), how many data
bytes the in-flight message still needs, the buffered first data byte, and
the channel filter. A status byte on the wrong channel clears the running
status, so its trailing data bytes die here instead of triggering voices.

Message semantics are deliberately thin: note on/off and pitch bend act on
the allocator directly; everything whose meaning is application-defined
(control change, aftertouch, program change, channel pressure) is handed to
embedder-supplied hooks. Hooks are plain boxed closures - allocated once at
construction, never when invoked.
*/

use crate::midi::{
    note_to_freq, MidiCommand, STATUS_BYTE_MASK, SYSTEM_COMMON_START, SYSTEM_REALTIME_START,
};
use crate::synth::{Voice, VoiceAllocator};

/// Application-supplied handlers for the messages the core does not map
/// itself. Every hook defaults to a no-op.
pub struct Hooks<V: Voice> {
    /// Control change, cc 0..119. Receives the allocator for broadcasts.
    pub control_change: Box<dyn FnMut(u8, u8, u8, &mut VoiceAllocator<V>) + Send>,
    /// Polyphonic aftertouch for a note with an allocated voice.
    pub poly_aftertouch: Box<dyn FnMut(u8, u8, u8, &mut V) + Send>,
    /// Program change.
    pub program_change: Box<dyn FnMut(u8, u8, &mut VoiceAllocator<V>) + Send>,
    /// Channel pressure. Decoded but unmapped by default.
    pub channel_pressure: Box<dyn FnMut(u8, u8, &mut VoiceAllocator<V>) + Send>,
}

impl<V: Voice> Default for Hooks<V> {
    fn default() -> Self {
        Self {
            control_change: Box::new(|_, _, _, _| {}),
            poly_aftertouch: Box::new(|_, _, _, _| {}),
            program_change: Box::new(|_, _, _| {}),
            channel_pressure: Box::new(|_, _, _| {}),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StatusByte {
    command: MidiCommand,
    channel: u8,
}

/// Byte-level MIDI decoder bound to one listen channel.
///
/// Feed every incoming byte to [`process`](Self::process); the decoder
/// borrows the allocator only for the duration of the call.
pub struct StreamDecoder<V: Voice> {
    listen_channel: u8,
    hooks: Hooks<V>,

    running_status: Option<StatusByte>,
    /// Data bytes the in-flight message still needs (0 = between messages).
    pending: u8,
    first_data: u8,
}

impl<V: Voice> StreamDecoder<V> {
    pub fn new(listen_channel: u8, hooks: Hooks<V>) -> Self {
        Self {
            listen_channel: listen_channel & 0x0F,
            hooks,
            running_status: None,
            pending: 0,
            first_data: 0,
        }
    }

    pub fn listen_channel(&self) -> u8 {
        self.listen_channel
    }

    /// Consume one byte of the MIDI stream, acting on `voices` when a
    /// message completes.
    pub fn process(&mut self, byte: u8, voices: &mut VoiceAllocator<V>) {
        // Real-time bytes pass through without corrupting any state
        if byte >= SYSTEM_REALTIME_START {
            return;
        }

        if byte & STATUS_BYTE_MASK != 0 {
            self.handle_status_byte(byte);
        } else {
            self.handle_data_byte(byte, voices);
        }
    }

    fn handle_status_byte(&mut self, byte: u8) {
        // Any non-real-time status discards a partial message
        self.pending = 0;

        if byte >= SYSTEM_COMMON_START {
            // System common / exclusive: tolerate, but running status dies.
            // SysEx payload bytes then fall through handle_data_byte as
            // stray data and are ignored.
            self.running_status = None;
            return;
        }

        let channel = byte & 0x0F;
        if channel != self.listen_channel {
            self.running_status = None;
            return;
        }

        // Upper nibble is 0x8..0xE here, so the command always decodes
        let Some(command) = MidiCommand::from_nibble(byte >> 4) else {
            return;
        };
        self.running_status = Some(StatusByte { command, channel });
        self.pending = command.data_len();
    }

    fn handle_data_byte(&mut self, byte: u8, voices: &mut VoiceAllocator<V>) {
        let Some(status) = self.running_status else {
            // Data before any status byte (or inside SysEx): ignore
            return;
        };

        if self.pending == 0 {
            // Running status: this byte opens another message of the same kind
            self.pending = status.command.data_len();
        }

        if self.pending == 2 {
            self.first_data = byte;
            self.pending = 1;
            return;
        }

        self.pending = 0;
        if status.command.data_len() == 2 {
            self.dispatch(status, self.first_data, byte, voices);
        } else {
            self.dispatch(status, byte, 0, voices);
        }
    }

    fn dispatch(
        &mut self,
        status: StatusByte,
        data1: u8,
        data2: u8,
        voices: &mut VoiceAllocator<V>,
    ) {
        match status.command {
            MidiCommand::NoteOn if data2 > 0 => {
                let voice = voices.allocate(data1);
                voice.trigger(note_to_freq(data1), data2 as f32 / 127.0);
            }
            // NoteOn with velocity 0 is a NoteOff; release velocity ignored.
            // find_allocated (never allocate) so a note whose voice was
            // stolen is a no-op rather than a cut-off of the new owner.
            MidiCommand::NoteOn | MidiCommand::NoteOff => {
                if let Some(voice) = voices.find_allocated(data1) {
                    voice.release();
                }
            }
            MidiCommand::PolyAftertouch => {
                if let Some(voice) = voices.find_allocated(data1) {
                    (self.hooks.poly_aftertouch)(status.channel, data1, data2, voice);
                }
            }
            MidiCommand::ControlChange => {
                // cc 120..127 are channel-mode messages: decoded, no action
                if data1 <= 119 {
                    (self.hooks.control_change)(status.channel, data1, data2, voices);
                }
            }
            MidiCommand::ProgramChange => {
                (self.hooks.program_change)(status.channel, data1, voices);
            }
            MidiCommand::ChannelPressure => {
                (self.hooks.channel_pressure)(status.channel, data1, voices);
            }
            MidiCommand::PitchBend => {
                let value = ((data2 as u16) << 7) | data1 as u16;
                let normalized = (value as f32 - 8192.0) / 8192.0;
                // Silent voices bend too, so they are in tune when triggered
                voices.for_each(|voice| voice.set_pitch_bend(normalized));
            }
        }
    }
}
