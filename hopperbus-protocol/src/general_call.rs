//! General call (broadcast) handling
//!
//! General calls are addressed to bus address 0 and reach every device on
//! the bus. They carry a single directive byte, no checksum, and are never
//! answered since there is no single recipient to answer for.

use hopperbus_hal::{AddressReset, Watchdog, WatchdogTimeout};

const DIRECTIVE_RESET_ADDRESS: u8 = 0x04;
const DIRECTIVE_RESET: u8 = 0x06;

/// Broadcast directives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeneralCallCommand {
    /// Revert the bus address to its default
    ResetAddress,
    /// Restart the device through the watchdog
    Reset,
}

impl GeneralCallCommand {
    /// Parse a directive from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            DIRECTIVE_RESET_ADDRESS => Some(GeneralCallCommand::ResetAddress),
            DIRECTIVE_RESET => Some(GeneralCallCommand::Reset),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            GeneralCallCommand::ResetAddress => DIRECTIVE_RESET_ADDRESS,
            GeneralCallCommand::Reset => DIRECTIVE_RESET,
        }
    }
}

/// Handle a general call frame
///
/// Returns the reply length, which is always 0. Does not return at all for
/// [`GeneralCallCommand::Reset`]. Empty frames and unknown directives are
/// ignored.
pub fn handle<W, A>(
    frame: &[u8],
    watchdog: &mut W,
    address_reset: &mut A,
    reset_timeout: WatchdogTimeout,
) -> usize
where
    W: Watchdog,
    A: AddressReset,
{
    let directive = frame.first().copied().and_then(GeneralCallCommand::from_byte);

    match directive {
        Some(GeneralCallCommand::Reset) => reset(watchdog, reset_timeout),
        Some(GeneralCallCommand::ResetAddress) => {
            #[cfg(feature = "defmt")]
            defmt::info!("General call: reset bus address");
            address_reset.reset_address();
        }
        None => {
            #[cfg(feature = "defmt")]
            defmt::trace!("General call ignored ({} bytes)", frame.len());
        }
    }

    0
}

/// Arm the watchdog and stall until it restarts the device
pub fn reset<W: Watchdog>(watchdog: &mut W, timeout: WatchdogTimeout) -> ! {
    #[cfg(feature = "defmt")]
    defmt::info!("General call: reset in {} ms", timeout.as_millis());

    watchdog.arm(timeout);
    watchdog.wait_for_reset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    /// Watchdog that unwinds instead of stalling
    #[derive(Default)]
    struct MockWatchdog {
        armed: Option<WatchdogTimeout>,
    }

    impl Watchdog for MockWatchdog {
        fn arm(&mut self, timeout: WatchdogTimeout) {
            self.armed = Some(timeout);
        }

        fn wait_for_reset(&mut self) -> ! {
            panic!("device halted");
        }
    }

    #[derive(Default)]
    struct MockAddress {
        resets: u32,
    }

    impl AddressReset for MockAddress {
        fn reset_address(&mut self) {
            self.resets += 1;
        }
    }

    #[test]
    fn test_directive_bytes() {
        assert_eq!(GeneralCallCommand::from_byte(0x04), Some(GeneralCallCommand::ResetAddress));
        assert_eq!(GeneralCallCommand::from_byte(0x06), Some(GeneralCallCommand::Reset));
        assert_eq!(GeneralCallCommand::from_byte(0x05), None);
        assert_eq!(GeneralCallCommand::Reset.to_byte(), 0x06);
        assert_eq!(GeneralCallCommand::ResetAddress.to_byte(), 0x04);
    }

    #[test]
    fn test_reset_address() {
        let mut wdt = MockWatchdog::default();
        let mut addr = MockAddress::default();

        let len = handle(&[0x04], &mut wdt, &mut addr, WatchdogTimeout::Ms15);

        assert_eq!(len, 0);
        assert_eq!(addr.resets, 1);
        assert_eq!(wdt.armed, None);
    }

    #[test]
    fn test_empty_and_unknown_ignored() {
        let mut wdt = MockWatchdog::default();
        let mut addr = MockAddress::default();

        assert_eq!(handle(&[], &mut wdt, &mut addr, WatchdogTimeout::Ms15), 0);
        assert_eq!(handle(&[0x99, 0x04], &mut wdt, &mut addr, WatchdogTimeout::Ms15), 0);
        assert_eq!(addr.resets, 0);
        assert_eq!(wdt.armed, None);
    }

    #[test]
    fn test_reset_arms_watchdog_and_halts() {
        let mut wdt = MockWatchdog::default();
        let mut addr = MockAddress::default();

        let result = catch_unwind(AssertUnwindSafe(|| {
            handle(&[0x06], &mut wdt, &mut addr, WatchdogTimeout::Ms30)
        }));

        assert!(result.is_err());
        assert_eq!(wdt.armed, Some(WatchdogTimeout::Ms30));
        assert_eq!(addr.resets, 0);
    }
}
