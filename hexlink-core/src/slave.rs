//! Slave role
//!
//! A slave owns a register file and answers requests addressed to its id.
//! Writes are acknowledged with a data-less `W` response, reads are answered
//! with the stored value.

use hexlink_protocol::{build, parse, Command, Direction, FrameBuf, FrameError, Operation};

/// Number of addressable registers
pub const REGISTER_COUNT: usize = 256;

/// Byte-wide registers addressed 0x00..=0xFF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    cells: [u8; REGISTER_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// All registers cleared to zero
    pub const fn new() -> Self {
        Self {
            cells: [0; REGISTER_COUNT],
        }
    }

    /// Current value of a register
    pub fn get(&self, address: u8) -> u8 {
        self.cells[address as usize]
    }

    /// Store a value in a register
    pub fn set(&mut self, address: u8, value: u8) {
        self.cells[address as usize] = value;
    }

    /// Raw view of every register
    pub fn as_bytes(&self) -> &[u8; REGISTER_COUNT] {
        &self.cells
    }
}

/// What the slave did with a valid request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlaveReply {
    /// Request was for this device; send this frame back
    Reply {
        /// The request as decoded
        request: Command,
        /// Response frame text
        frame: FrameBuf,
    },
    /// Request was addressed to another device
    Ignored { slave_id: u8 },
}

/// Reasons a line was not served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlaveError {
    /// Line failed frame validation
    Frame(FrameError),
    /// Line was a response, which slaves never answer
    NotARequest,
}

impl From<FrameError> for SlaveError {
    fn from(e: FrameError) -> Self {
        SlaveError::Frame(e)
    }
}

/// A slave device with its own persistent register file
#[derive(Debug, Clone)]
pub struct SlaveDevice {
    id: u8,
    registers: RegisterFile,
}

impl SlaveDevice {
    /// Create a slave answering to `id`, registers cleared
    pub const fn new(id: u8) -> Self {
        Self {
            id,
            registers: RegisterFile::new(),
        }
    }

    /// This device's slave id
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Registers, for inspection
    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Registers, for preloading values
    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.registers
    }

    /// Serve one received line
    pub fn handle(&mut self, line: &[u8]) -> Result<SlaveReply, SlaveError> {
        let frame = parse(line)?;
        if frame.direction != Direction::Request {
            return Err(SlaveError::NotARequest);
        }

        let request = frame.command;
        if request.slave_id != self.id {
            return Ok(SlaveReply::Ignored {
                slave_id: request.slave_id,
            });
        }

        let response = match request.operation {
            Operation::Write => {
                self.registers.set(request.address, request.data);
                Command::write(self.id, request.address, 0)
            }
            Operation::Read => {
                let value = self.registers.get(request.address);
                Command::read(self.id, request.address).with_data(value)
            }
        };

        Ok(SlaveReply::Reply {
            request,
            frame: build(response, Direction::Response),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_text(reply: SlaveReply) -> FrameBuf {
        match reply {
            SlaveReply::Reply { frame, .. } => frame,
            SlaveReply::Ignored { slave_id } => panic!("ignored frame for {:02X}", slave_id),
        }
    }

    #[test]
    fn test_write_is_acknowledged() {
        let mut slave = SlaveDevice::new(0x01);
        let reply = slave.handle(b"$01W10AA9B\n").unwrap();
        assert_eq!(reply_text(reply).as_str(), ":01W1019\n");
        assert_eq!(slave.registers().get(0x10), 0xAA);
    }

    #[test]
    fn test_read_returns_stored_value() {
        let mut slave = SlaveDevice::new(0x01);
        let reply = slave.handle(b"$01R1014\n").unwrap();
        assert_eq!(reply_text(reply).as_str(), ":01R100074\n");
    }

    #[test]
    fn test_writes_survive_to_later_reads() {
        let mut slave = SlaveDevice::new(0x01);
        slave.handle(b"$01W10AA9B\n").unwrap();
        let reply = slave.handle(b"$01R1014\n").unwrap();
        assert_eq!(reply_text(reply).as_str(), ":01R10AA96\n");
    }

    #[test]
    fn test_other_slave_ignored() {
        let mut slave = SlaveDevice::new(0x02);
        let reply = slave.handle(b"$01W10AA9B\n").unwrap();
        assert_eq!(reply, SlaveReply::Ignored { slave_id: 0x01 });
        assert_eq!(slave.registers().get(0x10), 0x00);
    }

    #[test]
    fn test_invalid_frame_reported() {
        let mut slave = SlaveDevice::new(0x01);
        assert_eq!(
            slave.handle(b"$01w10aaeb\n"),
            Err(SlaveError::Frame(FrameError::InvalidHexDigit { offset: 6 }))
        );
    }

    #[test]
    fn test_response_not_served() {
        let mut slave = SlaveDevice::new(0x01);
        assert_eq!(slave.handle(b":01W1019\n"), Err(SlaveError::NotARequest));
    }

    #[test]
    fn test_preloaded_registers() {
        let mut slave = SlaveDevice::new(0x02);
        slave.registers_mut().set(0x20, 0x55);
        let reply = slave.handle(b"$02R2016\n").unwrap();
        assert_eq!(reply_text(reply).as_str(), ":02R205580\n");
    }
}
