//! hexlink Hardware Abstraction Layer
//!
//! Traits for the byte-oriented link a hexlink node talks over. Chip HALs
//! (or test doubles) implement them; the role logic in `hexlink-core` only
//! ever sees these traits.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  hexlink-core (master / slave roles)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hexlink-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip UART driver / in-memory loopback  │
//! └─────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{DataBits, Parity, StopBits, Uart, UartConfig, UartRx, UartTx};
