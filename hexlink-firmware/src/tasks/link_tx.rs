//! Link UART transmit task
//!
//! Drains queued frames onto the bus, one complete frame at a time.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::OUTBOX;

/// Link TX task - writes queued frames to the UART
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        let frame = OUTBOX.receive().await;

        if let Err(e) = tx.write_all(frame.as_bytes()).await {
            warn!("Failed to send frame: {:?}", e);
            continue;
        }
        if let Err(e) = tx.flush().await {
            warn!("Failed to flush frame: {:?}", e);
            continue;
        }
        trace!("TX: {=str}", frame.trim_end());
    }
}
