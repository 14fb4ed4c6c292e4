//! Frame building and parsing
//!
//! A frame is one line of ASCII text:
//! - SENTINEL (1 char): `$` request, `:` response
//! - SLAVE ID (2 hex): addressed device
//! - OPERATION (1 char): `W` or `R`
//! - ADDRESS (2 hex): register
//! - DATA (2 hex): write requests and read responses only
//! - CHECKSUM (2 hex): wrapping sum of the characters from SLAVE ID to DATA
//! - LF terminator

use core::str::FromStr;

use heapless::String;

use crate::checksum::checksum;
use crate::command::Command;
use crate::grammar::{
    Direction, Layout, Operation, ADDRESS_OFFSET, DATA_OFFSET, MAX_FRAME_LEN, OPERATION_OFFSET,
    SHORT_FRAME_LEN, SLAVE_ID_OFFSET, TERMINATOR,
};
use crate::hex;

/// Encoded frame text, sized for the longest layout
pub type FrameBuf = String<MAX_FRAME_LEN>;

/// Reasons a received line is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Too short, or the length does not fit the direction and operation
    MalformedLength { len: usize },
    /// First character is not a known sentinel
    BadSentinel(u8),
    /// Operation letter is not `W` or `R`
    BadOperation(u8),
    /// Line does not end with LF
    MissingTerminator,
    /// A hex field holds something other than `0-9A-F`
    InvalidHexDigit { offset: usize },
    /// Checksum field disagrees with the body
    ChecksumMismatch { computed: u8, received: u8 },
}

/// A command together with the direction it travelled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Request or response
    pub direction: Direction,
    /// Decoded register command
    pub command: Command,
}

impl Frame {
    /// Create a request frame (master to slave)
    pub fn request(command: Command) -> Self {
        Self {
            direction: Direction::Request,
            command,
        }
    }

    /// Create a response frame (slave to master)
    pub fn response(command: Command) -> Self {
        Self {
            direction: Direction::Response,
            command,
        }
    }

    /// Field layout of this frame
    pub fn layout(&self) -> Layout {
        Layout::for_frame(self.direction, self.command.operation)
    }

    /// Encode this frame into wire text
    pub fn encode(&self) -> FrameBuf {
        build(self.command, self.direction)
    }
}

impl FromStr for Frame {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s.as_bytes())
    }
}

/// Build the wire text for `command` travelling in `direction`
///
/// Cannot fail: every `Command` is valid by construction. When the layout has
/// no data field, `command.data` is not emitted.
pub fn build(command: Command, direction: Direction) -> FrameBuf {
    let layout = Layout::for_frame(direction, command.operation);

    let mut raw = [0u8; MAX_FRAME_LEN];
    raw[0] = direction.sentinel();
    raw[SLAVE_ID_OFFSET..SLAVE_ID_OFFSET + 2].copy_from_slice(&hex::encode_byte(command.slave_id));
    raw[OPERATION_OFFSET] = command.operation.letter();
    raw[ADDRESS_OFFSET..ADDRESS_OFFSET + 2].copy_from_slice(&hex::encode_byte(command.address));
    if layout.has_data {
        raw[DATA_OFFSET..DATA_OFFSET + 2].copy_from_slice(&hex::encode_byte(command.data));
    }

    let sum = checksum(&raw[layout.body()]);
    let offset = layout.checksum_offset();
    raw[offset..offset + 2].copy_from_slice(&hex::encode_byte(sum));
    raw[offset + 2] = TERMINATOR;

    // Every byte written above is ASCII and the longest layout fills the
    // buffer exactly, so neither conversion can fail
    let text = core::str::from_utf8(&raw[..layout.frame_len()]).unwrap_or_default();
    FrameBuf::try_from(text).unwrap_or_default()
}

/// Validate one complete line and decode it
///
/// `line` must include the trailing LF. Nothing is buffered; a partial line
/// is simply rejected.
pub fn parse(line: &[u8]) -> Result<Frame, FrameError> {
    let len = line.len();
    if len < SHORT_FRAME_LEN {
        return Err(FrameError::MalformedLength { len });
    }
    if line[len - 1] != TERMINATOR {
        return Err(FrameError::MissingTerminator);
    }
    let direction = Direction::from_sentinel(line[0]).ok_or(FrameError::BadSentinel(line[0]))?;

    // Character classes first: every position except the sentinel, the
    // operation letter and the terminator must be an uppercase hex digit.
    check_hex_positions(line)?;

    let letter = line[OPERATION_OFFSET];
    let operation = Operation::from_letter(letter).ok_or(FrameError::BadOperation(letter))?;
    let layout =
        Layout::match_len(direction, operation, len).ok_or(FrameError::MalformedLength { len })?;

    let computed = checksum(&line[layout.body()]);
    let received = decode_at(line, layout.checksum_offset())?;
    if computed != received {
        return Err(FrameError::ChecksumMismatch { computed, received });
    }

    let slave_id = decode_at(line, SLAVE_ID_OFFSET)?;
    let address = decode_at(line, ADDRESS_OFFSET)?;
    let data = if layout.has_data {
        decode_at(line, DATA_OFFSET)?
    } else {
        0
    };

    Ok(Frame {
        direction,
        command: Command {
            slave_id,
            operation,
            address,
            data,
        },
    })
}

fn check_hex_positions(line: &[u8]) -> Result<(), FrameError> {
    let slave_id = SLAVE_ID_OFFSET..OPERATION_OFFSET;
    let rest = ADDRESS_OFFSET..line.len() - 1;
    match slave_id.chain(rest).find(|&i| !hex::is_hex_digit(line[i])) {
        Some(offset) => Err(FrameError::InvalidHexDigit { offset }),
        None => Ok(()),
    }
}

fn decode_at(line: &[u8], offset: usize) -> Result<u8, FrameError> {
    let (hi, lo) = (line[offset], line[offset + 1]);
    hex::decode_byte(hi, lo).ok_or_else(|| {
        let offset = if hex::is_hex_digit(hi) { offset + 1 } else { offset };
        FrameError::InvalidHexDigit { offset }
    })
}
