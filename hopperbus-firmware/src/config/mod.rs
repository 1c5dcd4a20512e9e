//! Device configuration
//!
//! `device.toml` is compiled into the firmware and checked by build.rs;
//! a file that still fails to parse here falls back to defaults.

use defmt::*;

use hopperbus_core::config::{parse_config, DeviceConfig};

/// Embedded configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../device.toml");

/// Parse the embedded configuration, using defaults on error
pub fn load_config() -> DeviceConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded device.toml");
            config
        }
        Err(e) => {
            warn!("Invalid device.toml ({:?}), using defaults", e);
            DeviceConfig::default()
        }
    };

    info!(
        "Config: address={=u8:#x}, threshold={}, settle={}ms, interval={}ms, reset={}ms",
        config.bus_address,
        config.hopper_threshold,
        config.led_settle_ms,
        config.measure_interval_ms,
        config.reset_timeout.as_millis()
    );

    config
}
