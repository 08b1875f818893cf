//! Escape-sequence script interpreter
//!
//! Controller initialization and addressing preambles are expressed as
//! compact byte-coded scripts instead of native code per controller: a script
//! is a read-only byte sequence mixing literal command/data bytes with
//! two-byte escapes (`0xFF` marker followed by an opcode). The tables live in
//! flash and may be shared across devices of the same controller family.
//!
//! Opcode space, second byte after the marker:
//!
//! | opcode        | meaning                                          |
//! |---------------|--------------------------------------------------|
//! | `0xFF`        | literal `0xFF` data byte                         |
//! | `0xFE`        | end of script                                    |
//! | `0xF0..=0xFD` | reserved, ignored                                |
//! | `0xE0..=0xEF` | address mode `op & 0x0F`                         |
//! | `0xD0..=0xDF` | chip select `op & 0x0F`                          |
//! | `0xC0..=0xCF` | reset pulse, `((op & 0x0F) << 4) + 2` ms per phase |
//! | `0xBE..=0xBF` | power rail `op & 0x01` (reserved)                |
//! | `0x00..=0x7F` | delay `op` ms                                    |
//!
//! Anything else is ignored for forward compatibility.
//!
//! ```
//! use pagegfx::escape::{script_ops, Op};
//!
//! let script = [0x3C, 0xFF, 0xD0, 0xFF, 0xFF, 0xFF, 0xFE];
//! let ops: Vec<Op> = script_ops(&script).collect();
//! assert_eq!(
//!     ops,
//!     [Op::Data(0x3C), Op::ChipSelect(0), Op::Data(0xFF), Op::End]
//! );
//! ```

use embedded_hal::delay::DelayNs;

use crate::transport::{AddressMode, Level, Transport};

/// Byte that introduces a two-byte escape.
pub const ESCAPE_MARKER: u8 = 0xFF;

const OP_END: u8 = 0xFE;

/// One decoded script operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Literal command/data byte, sent verbatim.
    Data(u8),
    /// Busy-wait for the given number of milliseconds (0..=127).
    Delay(u8),
    /// Switch the command/data address mode (nibble, 0 = command).
    AddressMode(u8),
    /// Select chip `n`; `0` deselects all (nibble).
    ChipSelect(u8),
    /// Reset pulse; the nibble scales the per-phase delay.
    Reset(u8),
    /// Power rail control (reserved; transports may ignore it).
    Power(u8),
    /// End of script.
    End,
}

impl Op {
    /// Per-phase delay of a reset pulse in milliseconds.
    pub fn reset_delay_ms(nibble: u8) -> u32 {
        ((u32::from(nibble) & 0x0F) << 4) + 2
    }

    /// Encode into at most two bytes; returns how many bytes were used.
    ///
    /// Decoding the encoded form with [`script_ops`] yields the operation
    /// back unchanged (nibble operands are masked on encode).
    pub fn encode(self, out: &mut [u8; 2]) -> usize {
        match self {
            Self::Data(ESCAPE_MARKER) => {
                *out = [ESCAPE_MARKER, ESCAPE_MARKER];
                2
            }
            Self::Data(byte) => {
                out[0] = byte;
                1
            }
            Self::Delay(ms) => {
                *out = [ESCAPE_MARKER, ms & 0x7F];
                2
            }
            Self::AddressMode(mode) => {
                *out = [ESCAPE_MARKER, 0xE0 | (mode & 0x0F)];
                2
            }
            Self::ChipSelect(index) => {
                *out = [ESCAPE_MARKER, 0xD0 | (index & 0x0F)];
                2
            }
            Self::Reset(nibble) => {
                *out = [ESCAPE_MARKER, 0xC0 | (nibble & 0x0F)];
                2
            }
            Self::Power(on) => {
                *out = [ESCAPE_MARKER, 0xBE | (on & 0x01)];
                2
            }
            Self::End => {
                *out = [ESCAPE_MARKER, OP_END];
                2
            }
        }
    }
}

/// Decode a script byte stream.
///
/// The iterator ends after an [`Op::End`] or at the end of the slice. A
/// trailing lone marker (escape opcode missing) ends the stream. Reserved
/// opcodes are skipped, never surfaced.
pub fn script_ops(script: &[u8]) -> ScriptOps<'_> {
    ScriptOps {
        bytes: script,
        pos: 0,
    }
}

/// Borrowing decoder over a script byte stream; see [`script_ops`].
#[derive(Clone, Debug)]
pub struct ScriptOps<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Iterator for ScriptOps<'_> {
    type Item = Op;

    fn next(&mut self) -> Option<Op> {
        loop {
            let byte = *self.bytes.get(self.pos)?;
            self.pos += 1;
            if byte != ESCAPE_MARKER {
                return Some(Op::Data(byte));
            }
            let op = *self.bytes.get(self.pos)?;
            self.pos += 1;
            match op {
                ESCAPE_MARKER => return Some(Op::Data(ESCAPE_MARKER)),
                OP_END => {
                    self.pos = self.bytes.len();
                    return Some(Op::End);
                }
                0xE0..=0xEF => return Some(Op::AddressMode(op & 0x0F)),
                0xD0..=0xDF => return Some(Op::ChipSelect(op & 0x0F)),
                0xC0..=0xCF => return Some(Op::Reset(op & 0x0F)),
                0xBE..=0xBF => return Some(Op::Power(op & 0x01)),
                0x00..=0x7F => return Some(Op::Delay(op)),
                // 0x80..=0xBD and 0xF0..=0xFD: reserved, ignore
                _ => {}
            }
        }
    }
}

/// Replay a script through a transport.
///
/// The first transport failure aborts the replay and propagates; there is no
/// resynchronization. Delays busy-wait on the supplied [`DelayNs`].
pub fn run<T, D>(transport: &mut T, delay: &mut D, script: &[u8]) -> Result<(), T::Error>
where
    T: Transport + ?Sized,
    D: DelayNs,
{
    for op in script_ops(script) {
        match op {
            Op::Data(byte) => transport.write_byte(byte)?,
            Op::Delay(ms) => delay.delay_ms(u32::from(ms)),
            Op::AddressMode(mode) => transport.set_address_mode(AddressMode::from_raw(mode))?,
            Op::ChipSelect(index) => transport.set_chip_select(index)?,
            Op::Reset(nibble) => {
                let ms = Op::reset_delay_ms(nibble);
                transport.set_reset(Level::Low)?;
                delay.delay_ms(ms);
                transport.set_reset(Level::High)?;
                delay.delay_ms(ms);
            }
            Op::Power(on) => transport.set_power(on != 0)?,
            Op::End => break,
        }
    }
    Ok(())
}
