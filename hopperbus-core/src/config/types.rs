//! Configuration type definitions

use hopperbus_hal::i2c::{validate_target_address, AddressError, DEFAULT_TARGET_ADDRESS};
use hopperbus_hal::WatchdogTimeout;

use crate::hopper::{DEFAULT_SETTLE_MS, DEFAULT_THRESHOLD};

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bus address unusable as a target address
    Address(AddressError),
    /// LED settle time must be nonzero
    ZeroSettleTime,
}

impl From<AddressError> for ConfigError {
    fn from(e: AddressError) -> Self {
        ConfigError::Address(e)
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// 7-bit target address on the bus
    pub bus_address: u8,
    /// Dark-minus-lit difference (ADC counts) above which the hopper is empty
    pub hopper_threshold: u16,
    /// Settle time after each LED change
    pub led_settle_ms: u32,
    /// Pause between measurement cycles (0 = back to back)
    pub measure_interval_ms: u32,
    /// Watchdog timeout used by the reset general call
    pub reset_timeout: WatchdogTimeout,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            bus_address: DEFAULT_TARGET_ADDRESS,
            hopper_threshold: DEFAULT_THRESHOLD,
            led_settle_ms: DEFAULT_SETTLE_MS,
            measure_interval_ms: 0,
            reset_timeout: WatchdogTimeout::Ms15,
        }
    }
}

impl DeviceConfig {
    /// Check the configuration for values the firmware cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_target_address(self.bus_address)?;
        if self.led_settle_ms == 0 {
            return Err(ConfigError::ZeroSettleTime);
        }
        Ok(())
    }
}
