//! Master role
//!
//! The master issues one request at a time and matches the reply against it.
//! The outstanding request (and with it the last addressed slave) lives in
//! the session object rather than in process-wide state.

use hexlink_protocol::{build, parse, Command, Direction, FrameBuf, FrameError};

/// Reasons a received line is not accepted as the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MasterError {
    /// Line failed frame validation
    Frame(FrameError),
    /// Line was a request, not a response
    NotAResponse,
    /// No request is waiting for a reply
    NoPendingRequest,
    /// Reply came from a different slave than the one addressed
    UnexpectedSlave { expected: u8, received: u8 },
    /// Reply operation or address differs from the request
    MismatchedReply,
}

impl From<FrameError> for MasterError {
    fn from(e: FrameError) -> Self {
        MasterError::Frame(e)
    }
}

/// Request/reply bookkeeping for a master node
#[derive(Debug, Clone, Default)]
pub struct MasterSession {
    pending: Option<Command>,
    last_slave_id: Option<u8>,
}

impl MasterSession {
    /// Create a session with nothing outstanding
    pub const fn new() -> Self {
        Self {
            pending: None,
            last_slave_id: None,
        }
    }

    /// Build a write request and mark it outstanding
    pub fn write(&mut self, slave_id: u8, address: u8, data: u8) -> FrameBuf {
        self.request(Command::write(slave_id, address, data))
    }

    /// Build a read request and mark it outstanding
    pub fn read(&mut self, slave_id: u8, address: u8) -> FrameBuf {
        self.request(Command::read(slave_id, address))
    }

    /// Build a request for `command` and mark it outstanding
    ///
    /// Replaces any request still waiting for a reply.
    pub fn request(&mut self, command: Command) -> FrameBuf {
        self.pending = Some(command);
        self.last_slave_id = Some(command.slave_id);
        build(command, Direction::Request)
    }

    /// Request still waiting for a reply
    pub fn pending(&self) -> Option<&Command> {
        self.pending.as_ref()
    }

    /// Slave addressed by the most recent request
    pub fn last_slave_id(&self) -> Option<u8> {
        self.last_slave_id
    }

    /// Give up on the outstanding request (e.g. after a timeout)
    pub fn abandon(&mut self) -> Option<Command> {
        self.pending.take()
    }

    /// Check a received line against the outstanding request
    ///
    /// A rejected line leaves the request outstanding so a later, valid
    /// reply can still complete it. A matching reply clears it.
    pub fn receive(&mut self, line: &[u8]) -> Result<Command, MasterError> {
        let frame = parse(line)?;
        if frame.direction != Direction::Response {
            return Err(MasterError::NotAResponse);
        }

        let pending = self.pending.ok_or(MasterError::NoPendingRequest)?;
        let reply = frame.command;
        if reply.slave_id != pending.slave_id {
            return Err(MasterError::UnexpectedSlave {
                expected: pending.slave_id,
                received: reply.slave_id,
            });
        }
        if reply.operation != pending.operation || reply.address != pending.address {
            return Err(MasterError::MismatchedReply);
        }

        self.pending = None;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexlink_protocol::Operation;

    #[test]
    fn test_requests_record_last_slave() {
        let mut master = MasterSession::new();
        assert_eq!(master.last_slave_id(), None);

        let frame = master.write(0x01, 0x10, 0xAA);
        assert_eq!(frame.as_str(), "$01W10AA9B\n");
        assert_eq!(master.last_slave_id(), Some(0x01));

        let frame = master.read(0x02, 0x20);
        assert_eq!(frame.as_str(), "$02R2016\n");
        assert_eq!(master.last_slave_id(), Some(0x02));
        assert_eq!(master.pending(), Some(&Command::read(0x02, 0x20)));
    }

    #[test]
    fn test_write_ack_completes_request() {
        let mut master = MasterSession::new();
        master.write(0x01, 0x10, 0xAA);

        let reply = master.receive(b":01W1019\n").unwrap();
        assert_eq!(reply, Command::write(0x01, 0x10, 0x00));
        assert_eq!(master.pending(), None);
    }

    #[test]
    fn test_read_reply_carries_data() {
        let mut master = MasterSession::new();
        master.read(0x01, 0x10);

        let reply = master.receive(b":01R10AA96\n").unwrap();
        assert_eq!(reply.operation, Operation::Read);
        assert_eq!(reply.data, 0xAA);
    }

    #[test]
    fn test_unexpected_slave_rejected() {
        let mut master = MasterSession::new();
        master.read(0x02, 0x10);

        assert_eq!(
            master.receive(b":01R100074\n"),
            Err(MasterError::UnexpectedSlave {
                expected: 0x02,
                received: 0x01
            })
        );
        // Still waiting for the right slave
        assert!(master.pending().is_some());
    }

    #[test]
    fn test_request_echo_rejected() {
        let mut master = MasterSession::new();
        master.write(0x01, 0x10, 0xAA);
        assert_eq!(
            master.receive(b"$01W10AA9B\n"),
            Err(MasterError::NotAResponse)
        );
    }

    #[test]
    fn test_reply_without_request() {
        let mut master = MasterSession::new();
        assert_eq!(
            master.receive(b":01W1019\n"),
            Err(MasterError::NoPendingRequest)
        );
    }

    #[test]
    fn test_mismatched_reply() {
        let mut master = MasterSession::new();
        master.read(0x01, 0x10);
        // Write ack for the right slave and register
        assert_eq!(
            master.receive(b":01W1019\n"),
            Err(MasterError::MismatchedReply)
        );
    }

    #[test]
    fn test_corrupted_reply() {
        let mut master = MasterSession::new();
        master.read(0x01, 0x10);
        assert_eq!(
            master.receive(b":01R100075\n"),
            Err(MasterError::Frame(FrameError::ChecksumMismatch {
                computed: 0x74,
                received: 0x75
            }))
        );
    }

    #[test]
    fn test_abandon_after_timeout() {
        let mut master = MasterSession::new();
        master.read(0x01, 0x10);
        assert_eq!(master.abandon(), Some(Command::read(0x01, 0x10)));
        assert_eq!(
            master.receive(b":01R100074\n"),
            Err(MasterError::NoPendingRequest)
        );
        assert_eq!(master.last_slave_id(), Some(0x01));
    }
}
