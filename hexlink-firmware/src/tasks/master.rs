//! Master polling task
//!
//! Periodically writes an incrementing value to one slave register and reads
//! it back, retrying each exchange on timeout or a rejected reply.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker, Timer};

use hexlink_core::{MasterConfig, MasterError};
use hexlink_protocol::Command;

use crate::channels::{MASTER_SESSION, OUTBOX, REPLY};

/// Why an exchange gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum ExchangeError {
    /// No reply within the timeout on the last attempt
    Timeout,
    /// Last attempt drew a reply the session rejected
    Rejected(MasterError),
}

/// Master task - polls the configured slave register
#[embassy_executor::task]
pub async fn master_task(config: MasterConfig) {
    info!(
        "Master task started: slave {=u8:X}, register {=u8:X}, every {} ms",
        config.target_id, config.register, config.poll_interval_ms
    );

    let mut ticker = Ticker::every(Duration::from_millis(config.poll_interval_ms as u64));
    let mut value: u8 = 0;

    loop {
        ticker.next().await;
        value = value.wrapping_add(1);

        let write = Command::write(config.target_id, config.register, value);
        if let Err(e) = exchange(&config, write).await {
            warn!("Write to slave {=u8:X} failed: {:?}", config.target_id, e);
            continue;
        }

        let read = Command::read(config.target_id, config.register);
        match exchange(&config, read).await {
            Ok(reply) if reply.data == value => {
                info!(
                    "Slave {=u8:X} register {=u8:X} = {=u8:X}",
                    reply.slave_id, reply.address, reply.data
                );
            }
            Ok(reply) => {
                warn!("Read back {=u8:X}, wrote {=u8:X}", reply.data, value);
            }
            Err(e) => {
                warn!("Read from slave {=u8:X} failed: {:?}", config.target_id, e);
            }
        }
    }
}

/// Send one request and wait for its reply, with retries
async fn exchange(config: &MasterConfig, command: Command) -> Result<Command, ExchangeError> {
    let timeout = Duration::from_millis(config.response_timeout_ms as u64);
    let mut last_error = ExchangeError::Timeout;

    for attempt in 1..=config.retries as u32 + 1 {
        REPLY.reset();
        let frame = MASTER_SESSION.lock().await.request(command);
        OUTBOX.send(frame).await;

        match select(REPLY.wait(), Timer::after(timeout)).await {
            Either::First(Ok(reply)) => return Ok(reply),
            Either::First(Err(e)) => {
                debug!("Attempt {}: reply rejected: {:?}", attempt, e);
                last_error = ExchangeError::Rejected(e);
            }
            Either::Second(()) => {
                MASTER_SESSION.lock().await.abandon();
                debug!("Attempt {}: no reply within {} ms", attempt, config.response_timeout_ms);
                last_error = ExchangeError::Timeout;
            }
        }
    }

    Err(last_error)
}
