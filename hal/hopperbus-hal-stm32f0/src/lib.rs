//! STM32F0-specific HAL for the Hopperbus firmware
//!
//! This crate implements the `hopperbus-hal` traits for STM32F0 chips:
//!
//! - STM32F042K6 / STM32F042F6
//!
//! # Features
//!
//! - `stm32f042k6`, `stm32f042f6` - Select the chip
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! The firmware drives the I2C peripheral through embassy-stm32 directly;
//! this crate supplies the target address configuration, error mapping
//! and the watchdog used by the reset general call.

#![no_std]

pub mod i2c;
pub mod watchdog;

pub use i2c::{target_config, I2cBusError};
pub use watchdog::IndependentWatchdog;
