//! Watchdog abstractions
//!
//! The bus protocol restarts the device by arming a short watchdog timeout
//! and then refusing to service it.

/// Watchdog timeout presets
///
/// Mirrors the fixed prescaler steps small MCUs offer. Chips with a finer
/// grained reload register round to the nearest value they can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchdogTimeout {
    #[default]
    Ms15,
    Ms30,
    Ms60,
    Ms120,
    Ms250,
    Ms500,
    Ms1000,
    Ms2000,
}

impl WatchdogTimeout {
    /// Timeout in milliseconds
    pub const fn as_millis(self) -> u32 {
        match self {
            WatchdogTimeout::Ms15 => 15,
            WatchdogTimeout::Ms30 => 30,
            WatchdogTimeout::Ms60 => 60,
            WatchdogTimeout::Ms120 => 120,
            WatchdogTimeout::Ms250 => 250,
            WatchdogTimeout::Ms500 => 500,
            WatchdogTimeout::Ms1000 => 1000,
            WatchdogTimeout::Ms2000 => 2000,
        }
    }

    /// Timeout in microseconds, as most reload calculations want it
    pub const fn as_micros(self) -> u32 {
        self.as_millis() * 1000
    }

    /// Look up the preset for an exact millisecond value
    pub fn from_millis(ms: u32) -> Option<Self> {
        match ms {
            15 => Some(WatchdogTimeout::Ms15),
            30 => Some(WatchdogTimeout::Ms30),
            60 => Some(WatchdogTimeout::Ms60),
            120 => Some(WatchdogTimeout::Ms120),
            250 => Some(WatchdogTimeout::Ms250),
            500 => Some(WatchdogTimeout::Ms500),
            1000 => Some(WatchdogTimeout::Ms1000),
            2000 => Some(WatchdogTimeout::Ms2000),
            _ => None,
        }
    }
}

/// Hardware watchdog used to force a full device restart
pub trait Watchdog {
    /// Start the watchdog with the given timeout
    ///
    /// Once armed the watchdog cannot be stopped; it resets the device
    /// unless it is fed before the timeout expires.
    fn arm(&mut self, timeout: WatchdogTimeout);

    /// Stop executing and let an armed watchdog reset the device
    ///
    /// Never returns. The default spins without feeding the watchdog.
    fn wait_for_reset(&mut self) -> ! {
        loop {
            core::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_millis_roundtrip() {
        let presets = [
            WatchdogTimeout::Ms15,
            WatchdogTimeout::Ms30,
            WatchdogTimeout::Ms60,
            WatchdogTimeout::Ms120,
            WatchdogTimeout::Ms250,
            WatchdogTimeout::Ms500,
            WatchdogTimeout::Ms1000,
            WatchdogTimeout::Ms2000,
        ];

        for preset in presets {
            assert_eq!(WatchdogTimeout::from_millis(preset.as_millis()), Some(preset));
        }
    }

    #[test]
    fn test_unknown_timeout() {
        assert_eq!(WatchdogTimeout::from_millis(0), None);
        assert_eq!(WatchdogTimeout::from_millis(16), None);
    }

    #[test]
    fn test_default_is_shortest() {
        assert_eq!(WatchdogTimeout::default().as_millis(), 15);
        assert_eq!(WatchdogTimeout::Ms15.as_micros(), 15_000);
    }
}
