//! Latest hopper measurement, shared between the sensor task and the bus
//!
//! The bus side runs at higher priority than the sensor loop and may
//! preempt it mid-update, so the pair is only ever read and written as a
//! whole inside a critical section.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Raw ADC readings of one measurement cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Reading with the LED on
    pub on: u16,
    /// Reading with the LED off
    pub off: u16,
}

impl Measurement {
    pub const fn new(on: u16, off: u16) -> Self {
        Self { on, off }
    }

    /// Wire format: `on` then `off`, both big-endian
    pub fn to_be_bytes(&self) -> [u8; 4] {
        let on = self.on.to_be_bytes();
        let off = self.off.to_be_bytes();
        [on[0], on[1], off[0], off[1]]
    }
}

/// Critical-section protected measurement slot
pub struct MeasurementStore {
    latest: Mutex<CriticalSectionRawMutex, Cell<Measurement>>,
}

impl Default for MeasurementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementStore {
    /// Create a store holding a zero measurement
    pub const fn new() -> Self {
        Self {
            latest: Mutex::new(Cell::new(Measurement::new(0, 0))),
        }
    }

    /// Replace the stored measurement
    pub fn store(&self, measurement: Measurement) {
        self.latest.lock(|m| m.set(measurement));
    }

    /// Most recent measurement
    pub fn latest(&self) -> Measurement {
        self.latest.lock(|m| m.get())
    }
}
