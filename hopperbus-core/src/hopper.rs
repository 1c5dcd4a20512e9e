//! Hopper light-barrier sensing
//!
//! An LED shines across the hopper onto a phototransistor. Each cycle
//! reads the sensor once with the LED on and once with it off; if the lit
//! reading is sufficiently lower (more light reached the sensor), nothing
//! is blocking the beam and the hopper is empty.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::measurement::{Measurement, MeasurementStore};
use crate::traits::{LightSensor, SensorError};

/// Default difference between dark and lit readings that counts as empty
pub const DEFAULT_THRESHOLD: u16 = 20;

/// Default time the phototransistor gets to settle after an LED change
pub const DEFAULT_SETTLE_MS: u32 = 10;

/// Errors from a measurement cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HopperError {
    /// Light sensor read failed
    Sensor(SensorError),
    /// GPIO operation failed
    Pin,
}

impl From<SensorError> for HopperError {
    fn from(e: SensorError) -> Self {
        HopperError::Sensor(e)
    }
}

/// Hopper fill level as signalled on the output pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HopperLevel {
    /// Beam blocked (output high)
    Full,
    /// Beam clear (output low)
    Empty,
}

impl HopperLevel {
    /// Classify a measurement
    ///
    /// Lower reading means more light, so the hopper is empty when the lit
    /// reading is below the dark one by more than `threshold`.
    pub fn classify(measurement: Measurement, threshold: u16) -> Self {
        let Measurement { on, off } = measurement;
        if on < off && off - on > threshold {
            HopperLevel::Empty
        } else {
            HopperLevel::Full
        }
    }
}

/// Hopper sensor: LED, phototransistor and level output
pub struct HopperSensor<L, S, O> {
    led: L,
    sensor: S,
    output: O,
    threshold: u16,
    settle_ms: u32,
}

impl<L, S, O> HopperSensor<L, S, O>
where
    L: OutputPin,
    S: LightSensor,
    O: OutputPin,
{
    /// Create a sensor with the default threshold and settle time
    pub fn new(led: L, sensor: S, output: O) -> Self {
        Self {
            led,
            sensor,
            output,
            threshold: DEFAULT_THRESHOLD,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    /// Set the empty-detection threshold in ADC counts
    pub fn with_threshold(mut self, threshold: u16) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the settle time after each LED change
    pub fn with_settle_ms(mut self, settle_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Run one measurement cycle
    ///
    /// Stores the readings in `store` and drives the output pin. On a read
    /// failure the LED is switched off and neither the store nor the
    /// output are touched.
    pub async fn measure<D: DelayNs>(
        &mut self,
        delay: &mut D,
        store: &MeasurementStore,
    ) -> Result<HopperLevel, HopperError> {
        self.led.set_high().map_err(|_| HopperError::Pin)?;
        delay.delay_ms(self.settle_ms).await;
        let on = self.sensor.read_raw().await;

        self.led.set_low().map_err(|_| HopperError::Pin)?;
        let on = on?;
        delay.delay_ms(self.settle_ms).await;
        let off = self.sensor.read_raw().await?;

        let measurement = Measurement::new(on, off);
        store.store(measurement);

        let level = HopperLevel::classify(measurement, self.threshold);
        let written = match level {
            HopperLevel::Empty => self.output.set_low(),
            HopperLevel::Full => self.output.set_high(),
        };
        written.map_err(|_| HopperError::Pin)?;

        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO pin for testing
    #[derive(Default)]
    struct MockPin {
        high: bool,
        writes: u32,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }
    }

    /// Returns queued readings in order
    struct MockSensor {
        readings: [Result<u16, SensorError>; 2],
        next: usize,
    }

    impl MockSensor {
        fn new(on: Result<u16, SensorError>, off: Result<u16, SensorError>) -> Self {
            Self {
                readings: [on, off],
                next: 0,
            }
        }
    }

    impl LightSensor for MockSensor {
        async fn read_raw(&mut self) -> Result<u16, SensorError> {
            let reading = self.readings[self.next];
            self.next += 1;
            reading
        }
    }

    /// Records total requested delay
    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    fn sensor(
        on: Result<u16, SensorError>,
        off: Result<u16, SensorError>,
    ) -> HopperSensor<MockPin, MockSensor, MockPin> {
        HopperSensor::new(MockPin::default(), MockSensor::new(on, off), MockPin::default())
    }

    #[test]
    fn test_classify() {
        assert_eq!(HopperLevel::classify(Measurement::new(100, 200), 20), HopperLevel::Empty);
        assert_eq!(HopperLevel::classify(Measurement::new(100, 120), 20), HopperLevel::Full);
        assert_eq!(HopperLevel::classify(Measurement::new(100, 121), 20), HopperLevel::Empty);
        assert_eq!(HopperLevel::classify(Measurement::new(300, 200), 20), HopperLevel::Full);
        assert_eq!(HopperLevel::classify(Measurement::new(200, 200), 0), HopperLevel::Full);
    }

    #[test]
    fn test_measure_empty() {
        let store = MeasurementStore::new();
        let mut delay = MockDelay::default();
        let mut hopper = sensor(Ok(100), Ok(600));

        let level = block_on(hopper.measure(&mut delay, &store)).unwrap();

        assert_eq!(level, HopperLevel::Empty);
        assert_eq!(store.latest(), Measurement::new(100, 600));
        assert!(!hopper.output.high);
        assert!(!hopper.led.high);
        assert_eq!(delay.total_ns, 20_000_000);
    }

    #[test]
    fn test_measure_full() {
        let store = MeasurementStore::new();
        let mut delay = MockDelay::default();
        let mut hopper = sensor(Ok(590), Ok(600)).with_threshold(20);

        let level = block_on(hopper.measure(&mut delay, &store)).unwrap();

        assert_eq!(level, HopperLevel::Full);
        assert!(hopper.output.high);
    }

    #[test]
    fn test_custom_settle_time() {
        let store = MeasurementStore::new();
        let mut delay = MockDelay::default();
        let mut hopper = sensor(Ok(1), Ok(2)).with_settle_ms(3);

        block_on(hopper.measure(&mut delay, &store)).unwrap();

        assert_eq!(delay.total_ns, 6_000_000);
    }

    #[test]
    fn test_read_failure_keeps_state() {
        let store = MeasurementStore::new();
        store.store(Measurement::new(7, 8));
        let mut delay = MockDelay::default();
        let mut hopper = sensor(Err(SensorError::ConversionError), Ok(600));

        let result = block_on(hopper.measure(&mut delay, &store));

        assert_eq!(result, Err(HopperError::Sensor(SensorError::ConversionError)));
        assert_eq!(store.latest(), Measurement::new(7, 8));
        assert!(!hopper.led.high);
        assert_eq!(hopper.output.writes, 0);
    }

    #[test]
    fn test_second_read_failure() {
        let store = MeasurementStore::new();
        let mut delay = MockDelay::default();
        let mut hopper = sensor(Ok(100), Err(SensorError::OutOfRange));

        let result = block_on(hopper.measure(&mut delay, &store));

        assert_eq!(result, Err(HopperError::Sensor(SensorError::OutOfRange)));
        assert_eq!(store.latest(), Measurement::default());
        assert_eq!(hopper.output.writes, 0);
    }
}
