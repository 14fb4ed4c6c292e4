//! Inter-task communication channels
//!
//! Static embassy-sync primitives shared by the link tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use hexlink_core::{MasterError, MasterSession};
use hexlink_protocol::{Command, FrameBuf};

/// Frames queued for transmission
const OUTBOX_SIZE: usize = 4;

/// Encoded frames waiting for the TX task
pub static OUTBOX: Channel<CriticalSectionRawMutex, FrameBuf, OUTBOX_SIZE> = Channel::new();

/// Master request/reply state, shared by the poll task and the RX task
pub static MASTER_SESSION: Mutex<CriticalSectionRawMutex, MasterSession> =
    Mutex::new(MasterSession::new());

/// Outcome of the latest reply line seen by the master
pub static REPLY: Signal<CriticalSectionRawMutex, Result<Command, MasterError>> = Signal::new();
