//! Register commands exchanged on the bus

use crate::grammar::Operation;

/// A single register operation addressed to one slave
///
/// `data` only travels on the wire when the frame layout has a data field
/// (write requests and read responses). Parsed commands without one carry 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Addressed device
    pub slave_id: u8,
    /// Register operation
    pub operation: Operation,
    /// Target register
    pub address: u8,
    /// Register value
    pub data: u8,
}

impl Command {
    /// Write `data` to `address` on `slave_id`
    pub fn write(slave_id: u8, address: u8, data: u8) -> Self {
        Self {
            slave_id,
            operation: Operation::Write,
            address,
            data,
        }
    }

    /// Read `address` on `slave_id`
    pub fn read(slave_id: u8, address: u8) -> Self {
        Self {
            slave_id,
            operation: Operation::Read,
            address,
            data: 0,
        }
    }

    /// Same command with a different data byte
    pub fn with_data(self, data: u8) -> Self {
        Self { data, ..self }
    }
}
