//! Hopperbus Hardware Abstraction Layer
//!
//! This crate defines the platform services the bus protocol and the
//! application lean on, so the protocol core can be exercised on the host
//! and implemented per chip.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  hopperbus-protocol / hopperbus-core    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hopperbus-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ hopperbus-hal-│
//!             │    stm32f0    │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`watchdog::Watchdog`] - Arm the hardware watchdog and wait for it to fire
//! - [`i2c::AddressReset`] - Revert the bus target address to its default

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod watchdog;

// Re-export key traits at crate root for convenience
pub use i2c::{AddressReset, TargetAddress, GENERAL_CALL_ADDRESS};
pub use watchdog::{Watchdog, WatchdogTimeout};
