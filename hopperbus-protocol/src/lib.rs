//! Hopperbus Bus Protocol
//!
//! This crate implements the target side of the request/response protocol
//! spoken between a bus master and the hopper interface board over a
//! two-wire (I2C) bus. The transport hands over one buffer per completed
//! bus transaction; this crate validates it, dispatches it and frames the
//! reply in place.
//!
//! # Protocol Overview
//!
//! Addressed transfers carry a trailing CRC-8 over the whole frame:
//! ```text
//! Request:  ┌─────────┬─────────────┬─────┐
//!           │ COMMAND │ PAYLOAD     │ CRC │
//!           │ 1B      │ 0–n B       │ 1B  │
//!           └─────────┴─────────────┴─────┘
//! Response: ┌─────────┬─────────────┬─────┐
//!           │ STATUS  │ PAYLOAD     │ CRC │
//!           │ 1B      │ 0–n B       │ 1B  │
//!           └─────────┴─────────────┴─────┘
//! ```
//!
//! A frame is valid when the CRC over all of its bytes, including the CRC
//! byte itself, is zero.
//!
//! General calls (address 0) are a single directive byte with no CRC and
//! are never answered.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod checksum;
pub mod command;
pub mod dispatcher;
pub mod general_call;
pub mod status;

pub use checksum::checksum;
pub use command::{CommandBuffer, CommandHandler, CommandRegistry, CommandTable, RegistryError};
pub use dispatcher::{Dispatcher, MIN_FRAME_LEN};
pub use general_call::GeneralCallCommand;
pub use status::{CommandResult, Status};
