//! Node configuration
//!
//! Configuration types plus a small no_std reader for the TOML subset the
//! firmware embeds.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
