//! Device configuration
//!
//! Board-agnostic configuration structures and their text format. The
//! firmware embeds a `device.toml` and parses it at startup.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
