//! Frame grammar
//!
//! Field layout for request and response frames. The total length of a frame
//! is fixed by its direction and operation:
//!
//! | Direction | Operation | Data field | Length |
//! |-----------|-----------|------------|--------|
//! | Request   | Write     | yes        | 11     |
//! | Request   | Read      | no         | 9      |
//! | Response  | Write     | no         | 9      |
//! | Response  | Read      | yes        | 11     |
//!
//! Lengths include the checksum field and the trailing line feed.

use core::ops::Range;

/// Request sentinel (master to slave)
pub const REQUEST_SENTINEL: u8 = b'$';

/// Response sentinel (slave to master)
pub const RESPONSE_SENTINEL: u8 = b':';

/// Line terminator closing every frame
pub const TERMINATOR: u8 = b'\n';

/// Write operation letter
pub const WRITE_LETTER: u8 = b'W';

/// Read operation letter
pub const READ_LETTER: u8 = b'R';

/// Offset of the slave id field
pub const SLAVE_ID_OFFSET: usize = 1;

/// Offset of the operation letter
pub const OPERATION_OFFSET: usize = 3;

/// Offset of the address field
pub const ADDRESS_OFFSET: usize = 4;

/// Offset of the data field, when present
pub const DATA_OFFSET: usize = 6;

/// Length of a frame without a data field
pub const SHORT_FRAME_LEN: usize = 9;

/// Length of a frame carrying a data field
pub const LONG_FRAME_LEN: usize = 11;

/// Longest frame the grammar allows
pub const MAX_FRAME_LEN: usize = LONG_FRAME_LEN;

/// Which way a frame travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Master to slave (`$`)
    Request,
    /// Slave to master (`:`)
    Response,
}

impl Direction {
    /// Leading character for this direction
    pub fn sentinel(self) -> u8 {
        match self {
            Direction::Request => REQUEST_SENTINEL,
            Direction::Response => RESPONSE_SENTINEL,
        }
    }

    /// Parse a direction from its leading character
    pub fn from_sentinel(c: u8) -> Option<Self> {
        match c {
            REQUEST_SENTINEL => Some(Direction::Request),
            RESPONSE_SENTINEL => Some(Direction::Response),
            _ => None,
        }
    }
}

/// Register operation carried by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// Store a byte in a slave register
    Write,
    /// Fetch a byte from a slave register
    Read,
}

impl Operation {
    /// Wire letter for this operation
    pub fn letter(self) -> u8 {
        match self {
            Operation::Write => WRITE_LETTER,
            Operation::Read => READ_LETTER,
        }
    }

    /// Parse an operation from its wire letter (uppercase only)
    pub fn from_letter(c: u8) -> Option<Self> {
        match c {
            WRITE_LETTER => Some(Operation::Write),
            READ_LETTER => Some(Operation::Read),
            _ => None,
        }
    }
}

/// Field layout of one (direction, operation) combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    /// Whether the frame carries a data field
    pub has_data: bool,
}

impl Layout {
    /// Layout for a frame travelling in `direction` with `operation`
    pub fn for_frame(direction: Direction, operation: Operation) -> Self {
        let has_data = matches!(
            (direction, operation),
            (Direction::Request, Operation::Write) | (Direction::Response, Operation::Read)
        );
        Self { has_data }
    }

    /// Layout for a received frame, if `len` is the one the grammar expects
    pub fn match_len(direction: Direction, operation: Operation, len: usize) -> Option<Self> {
        let layout = Self::for_frame(direction, operation);
        (layout.frame_len() == len).then_some(layout)
    }

    /// Total frame length including checksum and terminator
    pub fn frame_len(&self) -> usize {
        if self.has_data {
            LONG_FRAME_LEN
        } else {
            SHORT_FRAME_LEN
        }
    }

    /// Number of checksum-covered characters
    pub fn body_len(&self) -> usize {
        if self.has_data {
            7
        } else {
            5
        }
    }

    /// Checksum-covered span within the frame
    pub fn body(&self) -> Range<usize> {
        SLAVE_ID_OFFSET..SLAVE_ID_OFFSET + self.body_len()
    }

    /// Offset of the two checksum digits
    pub fn checksum_offset(&self) -> usize {
        SLAVE_ID_OFFSET + self.body_len()
    }
}
