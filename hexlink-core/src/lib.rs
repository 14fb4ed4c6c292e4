//! Board-agnostic node logic for hexlink
//!
//! Everything around the frame codec that does not depend on a specific
//! chip:
//!
//! - Line assembly on the receive path
//! - Slave role (register file, request handling)
//! - Master role (outstanding request tracking, reply matching)
//! - Blocking port that drives either role over a `hexlink-hal` UART
//! - Node configuration types

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod line;
pub mod master;
pub mod port;
pub mod slave;

pub use config::{ConfigError, MasterConfig, NodeConfig, Role};
pub use line::{Line, LineAssembler, LineError};
pub use master::{MasterError, MasterSession};
pub use port::{Port, PortError};
pub use slave::{RegisterFile, SlaveDevice, SlaveError, SlaveReply};
