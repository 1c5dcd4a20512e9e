//! Minimal TOML parser for the device configuration
//!
//! Handles only the subset `device.toml` uses. It does NOT support the
//! full TOML spec.
//!
//! Supported features:
//! - `[section]` headers
//! - `key = value` pairs with integer values (decimal or `0x` hex)
//! - Comments (# ...)
//!
//! ```toml
//! [bus]
//! address = 0x08
//!
//! [hopper]
//! threshold = 20
//! led_settle_ms = 10
//! measure_interval_ms = 0
//!
//! [reset]
//! timeout_ms = 15
//! ```

use hopperbus_hal::WatchdogTimeout;

use super::types::{ConfigError, DeviceConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Malformed or unknown section header
    InvalidSection { line: usize },
    /// Line is neither a header nor `key = value`
    Syntax { line: usize },
    /// Key not valid in its section
    UnknownKey { line: usize },
    /// Value is not an integer or out of range for its key
    InvalidValue { line: usize },
    /// Parsed configuration failed validation
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Bus,
    Hopper,
    Reset,
}

impl Section {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "bus" => Some(Section::Bus),
            "hopper" => Some(Section::Hopper),
            "reset" => Some(Section::Reset),
            _ => None,
        }
    }
}

/// Parse TOML configuration into a validated DeviceConfig
///
/// Keys that are not present keep their default values.
pub fn parse_config(text: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = strip_comment(raw).trim();
        if content.is_empty() {
            continue;
        }

        if let Some(header) = content.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(ParseError::InvalidSection { line })?;
            section = Section::from_name(name.trim()).ok_or(ParseError::InvalidSection { line })?;
            continue;
        }

        let (key, value) = content.split_once('=').ok_or(ParseError::Syntax { line })?;
        let key = key.trim();
        let value = parse_int(value.trim()).ok_or(ParseError::InvalidValue { line })?;

        apply(&mut config, section, key, value, line)?;
    }

    config.validate()?;
    Ok(config)
}

fn apply(
    config: &mut DeviceConfig,
    section: Section,
    key: &str,
    value: u32,
    line: usize,
) -> Result<(), ParseError> {
    let invalid = ParseError::InvalidValue { line };

    match (section, key) {
        (Section::Bus, "address") => {
            config.bus_address = u8::try_from(value).map_err(|_| invalid)?;
        }
        (Section::Hopper, "threshold") => {
            config.hopper_threshold = u16::try_from(value).map_err(|_| invalid)?;
        }
        (Section::Hopper, "led_settle_ms") => config.led_settle_ms = value,
        (Section::Hopper, "measure_interval_ms") => config.measure_interval_ms = value,
        (Section::Reset, "timeout_ms") => {
            config.reset_timeout = WatchdogTimeout::from_millis(value).ok_or(invalid)?;
        }
        _ => return Err(ParseError::UnknownKey { line }),
    }

    Ok(())
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_int(value: &str) -> Option<u32> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopperbus_hal::i2c::AddressError;

    const FULL_CONFIG: &str = r#"
# Hopper interface board
[bus]
address = 0x2A   # 42

[hopper]
threshold = 35
led_settle_ms = 12
measure_interval_ms = 250

[reset]
timeout_ms = 30
"#;

    #[test]
    fn test_parse_full() {
        let config = parse_config(FULL_CONFIG).unwrap();

        assert_eq!(config.bus_address, 0x2A);
        assert_eq!(config.hopper_threshold, 35);
        assert_eq!(config.led_settle_ms, 12);
        assert_eq!(config.measure_interval_ms, 250);
        assert_eq!(config.reset_timeout, WatchdogTimeout::Ms30);
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(parse_config("").unwrap(), DeviceConfig::default());
        assert_eq!(parse_config("# nothing here\n\n").unwrap(), DeviceConfig::default());
    }

    #[test]
    fn test_partial_keeps_defaults() {
        let config = parse_config("[hopper]\nthreshold = 50\n").unwrap();

        assert_eq!(config.hopper_threshold, 50);
        assert_eq!(config.bus_address, DeviceConfig::default().bus_address);
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_config("[bus]\naddress = 9\n[motor]\n"),
            Err(ParseError::InvalidSection { line: 3 })
        );
        assert_eq!(
            parse_config("[bus\n"),
            Err(ParseError::InvalidSection { line: 1 })
        );
    }

    #[test]
    fn test_key_outside_section() {
        assert_eq!(
            parse_config("address = 9\n"),
            Err(ParseError::UnknownKey { line: 1 })
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_config("[bus]\nspeed = 400000\n"),
            Err(ParseError::UnknownKey { line: 2 })
        );
    }

    #[test]
    fn test_syntax_error() {
        assert_eq!(
            parse_config("[bus]\naddress 9\n"),
            Err(ParseError::Syntax { line: 2 })
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[bus]\naddress = \"eight\"\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[bus]\naddress = 300\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[reset]\ntimeout_ms = 16\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
    }

    #[test]
    fn test_validation_applied() {
        assert_eq!(
            parse_config("[bus]\naddress = 0\n"),
            Err(ParseError::Invalid(ConfigError::Address(AddressError::Reserved)))
        );
        assert_eq!(
            parse_config("[hopper]\nled_settle_ms = 0\n"),
            Err(ParseError::Invalid(ConfigError::ZeroSettleTime))
        );
    }
}
