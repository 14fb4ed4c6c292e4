//! Blocking link driver
//!
//! Couples a UART with a [`LineAssembler`] so the role logic can be driven
//! over any `hexlink-hal` implementation.

use hexlink_hal::{UartRx, UartTx};
use hexlink_protocol::{Command, FrameBuf};

use crate::line::{Line, LineAssembler, LineError};
use crate::master::{MasterError, MasterSession};
use crate::slave::{SlaveDevice, SlaveError, SlaveReply};

/// Errors from driving a role over a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError<E> {
    /// Underlying transport failed
    Io(E),
    /// Received line was too long to be a frame
    Line(LineError),
    /// Slave rejected the line
    Slave(SlaveError),
    /// Master rejected the reply
    Master(MasterError),
}

/// A UART plus receive-side line assembly
pub struct Port<U> {
    uart: U,
    assembler: LineAssembler,
}

impl<U, E> Port<U>
where
    U: UartTx<Error = E> + UartRx<Error = E>,
{
    /// Wrap a UART
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            assembler: LineAssembler::new(),
        }
    }

    /// Give the UART back
    pub fn release(self) -> U {
        self.uart
    }

    /// Access the UART
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Transmit one frame and flush
    pub fn send(&mut self, frame: &FrameBuf) -> Result<(), PortError<E>> {
        self.uart
            .write_blocking(frame.as_bytes())
            .map_err(PortError::Io)?;
        self.uart.flush().map_err(PortError::Io)
    }

    /// Block until one complete line has arrived
    pub fn read_line(&mut self) -> Result<Line, PortError<E>> {
        loop {
            let byte = self.uart.read_byte().map_err(PortError::Io)?;
            if let Some(line) = self.assembler.feed(byte).map_err(PortError::Line)? {
                return Ok(line);
            }
        }
    }

    /// Receive one line, let the slave handle it, and send any reply
    pub fn serve(&mut self, slave: &mut SlaveDevice) -> Result<SlaveReply, PortError<E>> {
        let line = self.read_line()?;
        let reply = slave.handle(&line).map_err(PortError::Slave)?;
        if let SlaveReply::Reply { frame, .. } = &reply {
            self.send(frame)?;
        }
        Ok(reply)
    }

    /// Send a request and wait for the matching reply
    ///
    /// Lines that the session rejects fail the exchange; retrying is left to
    /// the caller.
    pub fn transact(
        &mut self,
        session: &mut MasterSession,
        command: Command,
    ) -> Result<Command, PortError<E>> {
        let request = session.request(command);
        self.send(&request)?;
        let line = self.read_line()?;
        session.receive(&line).map_err(PortError::Master)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::{Deque, Vec};
    use hexlink_protocol::FrameError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Exhausted;

    /// UART double: scripted input, captured output
    struct ScriptedUart {
        rx: Deque<u8, 64>,
        tx: Vec<u8, 64>,
        flushes: usize,
    }

    impl ScriptedUart {
        fn new(input: &[u8]) -> Self {
            let mut rx = Deque::new();
            for &byte in input {
                rx.push_back(byte).unwrap();
            }
            Self {
                rx,
                tx: Vec::new(),
                flushes: 0,
            }
        }
    }

    impl UartTx for ScriptedUart {
        type Error = Exhausted;

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), Exhausted> {
            self.tx.extend_from_slice(data).map_err(|_| Exhausted)
        }

        fn flush(&mut self) -> Result<(), Exhausted> {
            self.flushes += 1;
            Ok(())
        }
    }

    impl UartRx for ScriptedUart {
        type Error = Exhausted;

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Exhausted> {
            let mut n = 0;
            while n < buf.len() {
                match self.rx.pop_front() {
                    Some(byte) => {
                        buf[n] = byte;
                        n += 1;
                    }
                    None if n == 0 => return Err(Exhausted),
                    None => break,
                }
            }
            Ok(n)
        }
    }

    #[test]
    fn test_send_flushes() {
        let mut port = Port::new(ScriptedUart::new(&[]));
        let mut session = MasterSession::new();
        port.send(&session.read(0x01, 0x10)).unwrap();

        let uart = port.release();
        assert_eq!(uart.tx.as_slice(), b"$01R1014\n");
        assert_eq!(uart.flushes, 1);
    }

    #[test]
    fn test_serve_replies_to_own_requests() {
        let mut port = Port::new(ScriptedUart::new(b"$01W10AA9B\n$01R1014\n"));
        let mut slave = SlaveDevice::new(0x01);

        port.serve(&mut slave).unwrap();
        port.serve(&mut slave).unwrap();

        assert_eq!(port.uart_mut().tx.as_slice(), b":01W1019\n:01R10AA96\n");
    }

    #[test]
    fn test_serve_stays_silent_for_other_slaves() {
        let mut port = Port::new(ScriptedUart::new(b"$02R2016\n"));
        let mut slave = SlaveDevice::new(0x01);

        let reply = port.serve(&mut slave).unwrap();
        assert_eq!(reply, SlaveReply::Ignored { slave_id: 0x02 });
        assert!(port.uart_mut().tx.is_empty());
    }

    #[test]
    fn test_serve_reports_bad_frames() {
        let mut port = Port::new(ScriptedUart::new(b"$01R1015\n"));
        let mut slave = SlaveDevice::new(0x01);

        assert_eq!(
            port.serve(&mut slave),
            Err(PortError::Slave(SlaveError::Frame(
                FrameError::ChecksumMismatch {
                    computed: 0x14,
                    received: 0x15
                }
            )))
        );
    }

    #[test]
    fn test_transact_read() {
        let mut port = Port::new(ScriptedUart::new(b":01R100074\n"));
        let mut session = MasterSession::new();

        let reply = port.transact(&mut session, Command::read(0x01, 0x10)).unwrap();
        assert_eq!(reply, Command::read(0x01, 0x10));
        assert_eq!(port.uart_mut().tx.as_slice(), b"$01R1014\n");
    }

    #[test]
    fn test_transact_without_reply() {
        let mut port = Port::new(ScriptedUart::new(b":01R10"));
        let mut session = MasterSession::new();

        assert_eq!(
            port.transact(&mut session, Command::read(0x01, 0x10)),
            Err(PortError::Io(Exhausted))
        );
        assert!(session.pending().is_some());
    }

    #[test]
    fn test_overlong_line_reported() {
        let mut port = Port::new(ScriptedUart::new(b"$01W10AA9B0000\n"));
        assert_eq!(port.read_line(), Err(PortError::Line(LineError::Overflow)));
    }
}
