//! hexlink register protocol
//!
//! This crate defines the frame codec shared by the master and slave sides of
//! a hexlink serial bus. Every frame is a single line of printable ASCII, so
//! the bus can be watched and driven from any terminal.
//!
//! # Frame Overview
//!
//! ```text
//! ┌──────────┬──────────┬────┬─────────┬─────────┬──────────┬────┐
//! │ SENTINEL │ SLAVE ID │ OP │ ADDRESS │ DATA    │ CHECKSUM │ LF │
//! │ 1 char   │ 2 hex    │ 1  │ 2 hex   │ 0/2 hex │ 2 hex    │ 1  │
//! └──────────┴──────────┴────┴─────────┴─────────┴──────────┴────┘
//! ```
//!
//! `$` opens a request (master to slave), `:` a response (slave to master).
//! The data field is present for write requests and read responses only.
//! The checksum is the 8-bit wrapping sum of the characters between the
//! sentinel and the checksum field.
//!
//! The codec is pure: it never buffers partial input, never retries and
//! holds no state between calls.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod checksum;
pub mod command;
pub mod frame;
pub mod grammar;
pub mod hex;

pub use checksum::checksum;
pub use command::Command;
pub use frame::{build, parse, Frame, FrameBuf, FrameError};
pub use grammar::{Direction, Layout, Operation, LONG_FRAME_LEN, MAX_FRAME_LEN, SHORT_FRAME_LEN};
