//! Display power sequencing
//!
//! The display's reset line has a pull-up to the 3V3 rail, so it comes out
//! of reset as soon as 3V3 is up. The sequence holds reset low while the
//! logic supply comes up, releases it, then starts the boost converter
//! that powers the LEDs.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

/// Time between enabling 3V3 and releasing reset
pub const SUPPLY_SETTLE_MS: u32 = 1;

/// Time between releasing reset and enabling the boost converter
pub const RESET_RELEASE_MS: u32 = 1;

/// Time the boost converter gets before the display is used
pub const BOOST_SETTLE_MS: u32 = 5;

/// Errors from display power control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// GPIO operation failed
    Pin,
}

/// Display power and reset lines
///
/// `reset` must be an open-drain output: driving it high releases the line
/// to the external pull-up instead of pushing 5V into a 3V3 input.
pub struct DisplayPower<R, S, B> {
    reset: R,
    supply: S,
    boost: B,
}

impl<R, S, B> DisplayPower<R, S, B>
where
    R: OutputPin,
    S: OutputPin,
    B: OutputPin,
{
    pub fn new(reset: R, supply: S, boost: B) -> Self {
        Self {
            reset,
            supply,
            boost,
        }
    }

    /// Bring the display up
    ///
    /// Slower than the datasheet minimums.
    pub async fn power_up<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.reset.set_low().map_err(|_| DisplayError::Pin)?;
        self.supply.set_high().map_err(|_| DisplayError::Pin)?;
        delay.delay_ms(SUPPLY_SETTLE_MS).await;

        self.reset.set_high().map_err(|_| DisplayError::Pin)?;
        delay.delay_ms(RESET_RELEASE_MS).await;

        self.boost.set_high().map_err(|_| DisplayError::Pin)?;
        delay.delay_ms(BOOST_SETTLE_MS).await;

        #[cfg(feature = "defmt")]
        defmt::info!("Display powered up");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use embassy_futures::block_on;
    use embedded_hal::digital::ErrorType;
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Step {
        Pin(&'static str, bool),
        Delay(u32),
    }

    type Log = RefCell<Vec<Step, 16>>;

    struct LogPin<'a> {
        name: &'static str,
        log: &'a Log,
        fail: bool,
    }

    impl ErrorType for LogPin<'_> {
        type Error = embedded_hal::digital::ErrorKind;
    }

    impl OutputPin for LogPin<'_> {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            if self.fail {
                return Err(embedded_hal::digital::ErrorKind::Other);
            }
            self.log.borrow_mut().push(Step::Pin(self.name, true)).unwrap();
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            if self.fail {
                return Err(embedded_hal::digital::ErrorKind::Other);
            }
            self.log.borrow_mut().push(Step::Pin(self.name, false)).unwrap();
            Ok(())
        }
    }

    struct LogDelay<'a> {
        log: &'a Log,
    }

    impl DelayNs for LogDelay<'_> {
        async fn delay_ns(&mut self, ns: u32) {
            self.log.borrow_mut().push(Step::Delay(ns / 1_000_000)).unwrap();
        }
    }

    fn pin<'a>(name: &'static str, log: &'a Log) -> LogPin<'a> {
        LogPin {
            name,
            log,
            fail: false,
        }
    }

    #[test]
    fn test_power_up_sequence() {
        let log = Log::default();
        let mut power = DisplayPower::new(pin("reset", &log), pin("3v3", &log), pin("boost", &log));
        let mut delay = LogDelay { log: &log };

        block_on(power.power_up(&mut delay)).unwrap();

        assert_eq!(
            log.borrow().as_slice(),
            &[
                Step::Pin("reset", false),
                Step::Pin("3v3", true),
                Step::Delay(1),
                Step::Pin("reset", true),
                Step::Delay(1),
                Step::Pin("boost", true),
                Step::Delay(5),
            ]
        );
    }

    #[test]
    fn test_pin_error_stops_sequence() {
        let log = Log::default();
        let mut boost = pin("boost", &log);
        boost.fail = true;
        let mut power = DisplayPower::new(pin("reset", &log), pin("3v3", &log), boost);
        let mut delay = LogDelay { log: &log };

        assert_eq!(block_on(power.power_up(&mut delay)), Err(DisplayError::Pin));

        assert_eq!(log.borrow().len(), 5);
    }
}
