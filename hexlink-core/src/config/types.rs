//! Node configuration types
//!
//! Board-agnostic settings for one node on the bus. With the `serde` feature
//! the same types deserialize directly from TOML.

use hexlink_hal::UartConfig;
use hexlink_protocol::MAX_FRAME_LEN;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which side of the exchange this node plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    /// Issues requests and waits for replies
    Master,
    /// Owns a register file and answers requests addressed to it
    #[default]
    Slave,
}

/// Settings used only by a master node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MasterConfig {
    /// Slave polled by the master
    pub target_id: u8,
    /// Register written and read back on every poll
    pub register: u8,
    /// How long to wait for a reply
    pub response_timeout_ms: u32,
    /// Time between polls
    pub poll_interval_ms: u32,
    /// Extra attempts after a timeout or a rejected reply
    pub retries: u8,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            target_id: 0x01,
            register: 0x10,
            response_timeout_ms: 200,
            poll_interval_ms: 1000,
            retries: 2,
        }
    }
}

/// Complete node configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NodeConfig {
    /// Master or slave
    pub role: Role,
    /// This device's slave id (slave role)
    pub device_id: u8,
    /// Link baud rate
    pub baudrate: u32,
    /// Master polling settings
    pub master: MasterConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            role: Role::Slave,
            device_id: 0x01,
            baudrate: 115200,
            master: MasterConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate of zero
    InvalidBaudrate,
    /// Reply timeout shorter than a request plus its reply on the wire
    TimeoutTooShort { min_ms: u32 },
    /// Poll interval shorter than the reply timeout
    PollFasterThanTimeout,
}

impl NodeConfig {
    /// UART settings for the link (8N1)
    pub fn uart(&self) -> UartConfig {
        UartConfig::with_baudrate(self.baudrate)
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let round_trip_us = self
            .uart()
            .transfer_time_us(2 * MAX_FRAME_LEN)
            .ok_or(ConfigError::InvalidBaudrate)?;

        if self.role == Role::Master {
            let min_ms = round_trip_us.div_ceil(1000);
            if self.master.response_timeout_ms < min_ms {
                return Err(ConfigError::TimeoutTooShort { min_ms });
            }
            if self.master.poll_interval_ms < self.master.response_timeout_ms {
                return Err(ConfigError::PollFasterThanTimeout);
            }
        }
        Ok(())
    }
}
