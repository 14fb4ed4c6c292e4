//! Link UART receive task
//!
//! Assembles lines from the bus and hands them to the active role.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use hexlink_core::{Line, LineAssembler, MasterError, Role, SlaveDevice, SlaveReply};

use crate::channels::{MASTER_SESSION, OUTBOX, REPLY};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - receives lines and dispatches them by role
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx, role: Role, device_id: u8) {
    info!("Link RX task started ({:?}, id {=u8:X})", role, device_id);

    let mut assembler = LineAssembler::new();
    // Owned by this task for the whole run, so writes persist across requests
    let mut slave = SlaveDevice::new(device_id);
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                let mut pending = &buf[..n];
                while !pending.is_empty() {
                    let (outcome, rest) = assembler.feed_bytes(pending);
                    pending = rest;

                    match outcome {
                        Ok(Some(line)) => match role {
                            Role::Slave => serve_request(&mut slave, &line).await,
                            Role::Master => deliver_reply(&line).await,
                        },
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Line dropped: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Let the slave handle a request and queue its reply
async fn serve_request(slave: &mut SlaveDevice, line: &Line) {
    match slave.handle(line) {
        Ok(SlaveReply::Reply { request, frame }) => {
            debug!(
                "Request {:?} addr={=u8:X} data={=u8:X}",
                request.operation, request.address, request.data
            );
            OUTBOX.send(frame).await;
        }
        Ok(SlaveReply::Ignored { slave_id }) => {
            trace!("Ignored frame for slave {=u8:X}", slave_id);
        }
        Err(e) => {
            warn!("Invalid frame received: {:?}", e);
        }
    }
}

/// Match a reply against the outstanding request and wake the poll task
async fn deliver_reply(line: &Line) {
    let result = MASTER_SESSION.lock().await.receive(line);
    match result {
        Err(MasterError::NoPendingRequest) => {
            // Late reply after a timeout; nobody is waiting for it
            debug!("Reply with no outstanding request dropped");
        }
        Err(MasterError::NotAResponse) => {
            // Our own request echoed back on a shared bus
            trace!("Request frame ignored");
        }
        other => REPLY.signal(other),
    }
}
