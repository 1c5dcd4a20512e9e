//! State shared between Embassy tasks

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use hopperbus_core::measurement::MeasurementStore;

/// Latest hopper readings (written by hopper task, read by bus commands)
pub static MEASUREMENTS: MeasurementStore = MeasurementStore::new();

/// Address reset requested by a general call (consumed by the bus task)
pub static ADDRESS_RESET: Signal<CriticalSectionRawMutex, ()> = Signal::new();
