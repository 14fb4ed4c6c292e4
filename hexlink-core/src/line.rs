//! Line assembly for the receive path
//!
//! The frame codec only accepts complete lines. This accumulates bytes from
//! the link until a line feed arrives and hands the whole line over.
//! Lines longer than any legal frame are dropped up to the next line feed,
//! which resynchronizes the receiver after noise or a lost terminator.

use heapless::Vec;
use hexlink_protocol::grammar::TERMINATOR;
use hexlink_protocol::MAX_FRAME_LEN;

/// Longest line kept by the assembler
pub const MAX_LINE_LEN: usize = MAX_FRAME_LEN;

/// One complete received line, terminator included
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Errors raised while assembling lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded `MAX_LINE_LEN`; the rest of it is discarded
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssembleState {
    /// Storing bytes of the current line
    Collecting,
    /// Skipping the tail of an overlong line
    Discarding,
}

/// Accumulates link bytes into lines
#[derive(Debug, Clone)]
pub struct LineAssembler {
    state: AssembleState,
    buffer: Line,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self {
            state: AssembleState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.state = AssembleState::Collecting;
        self.buffer.clear();
    }

    /// Number of bytes held for the current line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a line feed completes a line,
    /// `Ok(None)` when more bytes are needed, or `Err` once per overlong line.
    /// A bare line feed (empty line) is skipped.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        match self.state {
            AssembleState::Collecting => {
                if byte == TERMINATOR && self.buffer.is_empty() {
                    return Ok(None);
                }
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    if byte != TERMINATOR {
                        self.state = AssembleState::Discarding;
                    }
                    return Err(LineError::Overflow);
                }
                if byte == TERMINATOR {
                    let line = core::mem::take(&mut self.buffer);
                    return Ok(Some(line));
                }
                Ok(None)
            }
            AssembleState::Discarding => {
                if byte == TERMINATOR {
                    self.state = AssembleState::Collecting;
                }
                Ok(None)
            }
        }
    }

    /// Feed bytes until the first complete line or error
    ///
    /// Returns the outcome together with the bytes that were not consumed,
    /// so the caller can keep feeding the remainder.
    pub fn feed_bytes<'a>(
        &mut self,
        bytes: &'a [u8],
    ) -> (Result<Option<Line>, LineError>, &'a [u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                outcome => return (outcome, &bytes[i + 1..]),
            }
        }
        (Ok(None), &[])
    }
}
