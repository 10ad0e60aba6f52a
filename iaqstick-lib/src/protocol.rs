//! Command framing for the iAQ Stick request/response protocol.
//!
//! The stick speaks two incompatible framing conventions over the same
//! 16-byte bulk pipe. Type 1 frames carry the sequence number as four
//! uppercase hex digits and are answered with text; type 2 frames carry it
//! as a single raw byte and are answered with binary data. Each convention
//! keeps its own counter, and the counters advance by different rules.

use crate::constants::{FILLER, FRAME_SIZE, TYPE1_SEQ_START, TYPE2_SEQ_START};

/// Commands sent with type 1 framing. Responses are textual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type1Command {
    /// `*IDN?` - identity string
    Identify,
    /// `KNOBPRE?` - knob (calibration parameter) presets
    KnobPresets,
    /// `WFMPRE?` - waveform preamble, channel layout
    WaveformPreamble,
    /// `FLAGS?` - flag names
    Flags,
    /// `FLAGGET?` - current flag values
    FlagGet,
}

impl Type1Command {
    pub fn text(&self) -> &'static str {
        match self {
            Type1Command::Identify => "*IDN?",
            Type1Command::KnobPresets => "KNOBPRE?",
            Type1Command::WaveformPreamble => "WFMPRE?",
            Type1Command::Flags => "FLAGS?",
            Type1Command::FlagGet => "FLAGGET?",
        }
    }
}

/// Commands sent with type 2 framing. Responses are raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type2Command {
    /// `*TR` - trigger a measurement readout
    TriggerRead,
}

impl Type2Command {
    pub fn text(&self) -> &'static str {
        match self {
            Type2Command::TriggerRead => "*TR",
        }
    }
}

/// Sequence counter for type 1 frames: 16-bit, plain wraparound.
#[derive(Debug, Clone, Copy)]
pub struct Type1Counter(u16);

impl Type1Counter {
    pub fn new() -> Self {
        Self(TYPE1_SEQ_START)
    }

    /// Current value, advancing the counter for the next frame.
    pub fn next(&mut self) -> u16 {
        let seq = self.0;
        self.0 = self.0.wrapping_add(1);
        seq
    }
}

impl Default for Type1Counter {
    fn default() -> Self {
        Self::new()
    }
}

/// Sequence counter for type 2 frames: 8-bit, running 0x67..=0xFF.
///
/// After handing out 0xFF the counter restarts at 0x67. It never passes
/// through 0x00; this is a device invariant, not generic wraparound.
#[derive(Debug, Clone, Copy)]
pub struct Type2Counter(u8);

impl Type2Counter {
    pub fn new() -> Self {
        Self(TYPE2_SEQ_START)
    }

    /// Current value, advancing the counter for the next frame.
    pub fn next(&mut self) -> u8 {
        let seq = self.0;
        self.0 = if self.0 < 0xFF { self.0 + 1 } else { TYPE2_SEQ_START };
        seq
    }
}

impl Default for Type2Counter {
    fn default() -> Self {
        Self::new()
    }
}

/// All-filler synchronization frame, written once during setup. The stick
/// sends no response to it.
pub const SYNC_FRAME: [u8; FRAME_SIZE] = [FILLER; FRAME_SIZE];

/// Build a type 1 frame: marker, four uppercase hex digits of the sequence
/// number, the command text, a newline, filler to 16 bytes. Content longer
/// than a frame is truncated.
pub fn type1_frame(seq: u16, command: &str) -> [u8; FRAME_SIZE] {
    let content = format!("@{seq:04X}{command}\n");
    fill_frame(content.as_bytes())
}

/// Build a type 2 frame: marker, the sequence counter as one raw byte, the
/// command text, a newline, filler to 16 bytes.
pub fn type2_frame(seq: u8, command: &str) -> [u8; FRAME_SIZE] {
    let mut content = Vec::with_capacity(FRAME_SIZE);
    content.push(b'@');
    content.push(seq);
    content.extend_from_slice(command.as_bytes());
    content.push(b'\n');
    fill_frame(&content)
}

fn fill_frame(content: &[u8]) -> [u8; FRAME_SIZE] {
    let mut frame = [FILLER; FRAME_SIZE];
    let n = content.len().min(FRAME_SIZE);
    frame[..n].copy_from_slice(&content[..n]);
    frame
}

/// Decode a type 1 response as ISO 8859-1, one char per byte.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
