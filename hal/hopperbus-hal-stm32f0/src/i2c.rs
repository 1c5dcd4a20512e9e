//! I2C target configuration for STM32F0
//!
//! The board answers on its own address and on the general call address.

use embassy_stm32::i2c::{Address, Error as I2cError, OwnAddresses, SlaveAddrConfig};

/// Target configuration for `address` with general call reception enabled
pub fn target_config(address: u8) -> SlaveAddrConfig {
    SlaveAddrConfig {
        addr: OwnAddresses::OA1(Address::SevenBit(address)),
        general_call: true,
    }
}

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Bus error
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received
    Nack,
    /// Timeout
    Timeout,
    /// CRC error
    Crc,
    /// Overrun
    Overrun,
    /// Other error
    Other,
}

impl From<I2cError> for I2cBusError {
    fn from(e: I2cError) -> Self {
        match e {
            I2cError::Bus => I2cBusError::Bus,
            I2cError::Arbitration => I2cBusError::ArbitrationLost,
            I2cError::Nack => I2cBusError::Nack,
            I2cError::Timeout => I2cBusError::Timeout,
            I2cError::Crc => I2cBusError::Crc,
            I2cError::Overrun => I2cBusError::Overrun,
            _ => I2cBusError::Other,
        }
    }
}

impl I2cBusError {
    /// Errors the master causes by ending a transfer early
    ///
    /// A master that reads fewer bytes than offered NACKs the last one;
    /// that is normal operation for a target, not a fault.
    pub fn is_benign(self) -> bool {
        matches!(self, I2cBusError::Nack)
    }
}
