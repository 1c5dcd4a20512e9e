//! Build script for hopperbus-firmware
//!
//! - Passes the cortex-m-rt and defmt linker scripts
//! - Validates device.toml at compile time

use std::fs;
use std::path::Path;

/// Reserved 7-bit addresses at the bottom and top of the address space
const ADDRESS_RANGE: std::ops::RangeInclusive<i64> = 0x08..=0x77;

/// Timeouts the watchdog prescaler can hit
const RESET_TIMEOUTS_MS: &[i64] = &[15, 30, 60, 120, 250, 500, 1000, 2000];

fn main() {
    setup_linker();
    validate_config();
}

/// Linker scripts; memory.x comes from embassy-stm32's `memory-x` feature
fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_bus(&config, &mut errors);
    validate_hopper(&config, &mut errors);
    validate_reset(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid device.toml                                      ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=device.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only `[bus]`, `[hopper]` and `[reset]` tables are understood
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        if !["bus", "hopper", "reset"].contains(&name.as_str()) {
            errors.push(format!("unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }
}

/// Check that every key in `section` is one of `known`
fn check_keys(config: &toml::Value, section: &str, known: &[&str], errors: &mut Vec<String>) {
    let Some(table) = config.get(section).and_then(|s| s.as_table()) else {
        return;
    };

    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            errors.push(format!("[{}] unknown key '{}'", section, key));
        }
    }
}

/// Integer value of `section.key`, recording an error for other types
fn integer(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> Option<i64> {
    match config.get(section)?.get(key)? {
        toml::Value::Integer(v) => Some(*v),
        _ => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
    }
}

fn validate_bus(config: &toml::Value, errors: &mut Vec<String>) {
    check_keys(config, "bus", &["address"], errors);

    if let Some(address) = integer(config, "bus", "address", errors) {
        if !ADDRESS_RANGE.contains(&address) {
            errors.push(format!("[bus] address must be 0x08-0x77, got {:#x}", address));
        }
    }
}

fn validate_hopper(config: &toml::Value, errors: &mut Vec<String>) {
    check_keys(
        config,
        "hopper",
        &["threshold", "led_settle_ms", "measure_interval_ms"],
        errors,
    );

    if let Some(threshold) = integer(config, "hopper", "threshold", errors) {
        if !(0..=u16::MAX as i64).contains(&threshold) {
            errors.push("[hopper] threshold must be 0-65535".to_string());
        }
    }

    if let Some(settle) = integer(config, "hopper", "led_settle_ms", errors) {
        if !(1..=u32::MAX as i64).contains(&settle) {
            errors.push("[hopper] led_settle_ms must be at least 1".to_string());
        }
    }

    if let Some(interval) = integer(config, "hopper", "measure_interval_ms", errors) {
        if !(0..=u32::MAX as i64).contains(&interval) {
            errors.push("[hopper] measure_interval_ms must not be negative".to_string());
        }
    }
}

fn validate_reset(config: &toml::Value, errors: &mut Vec<String>) {
    check_keys(config, "reset", &["timeout_ms"], errors);

    if let Some(timeout) = integer(config, "reset", "timeout_ms", errors) {
        if !RESET_TIMEOUTS_MS.contains(&timeout) {
            errors.push(format!(
                "[reset] timeout_ms must be one of {:?}",
                RESET_TIMEOUTS_MS
            ));
        }
    }
}
