//! Board-agnostic application logic for the hopper interface board
//!
//! This crate contains everything the firmware does that does not depend
//! on a specific chip:
//!
//! - Device configuration and its text format
//! - Measurement store shared between the sensor task and the bus
//! - Hopper light-barrier sensing
//! - Display power-up sequencing
//! - The bus command table

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod commands;
pub mod config;
pub mod display;
pub mod hopper;
pub mod measurement;
pub mod traits;
