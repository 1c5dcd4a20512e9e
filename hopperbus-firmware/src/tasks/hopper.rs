//! Hopper measurement task

use defmt::*;
use embassy_stm32::gpio::Output;
use embassy_time::{Delay, Timer};

use hopperbus_core::hopper::HopperSensor;

use crate::channels::MEASUREMENTS;
use crate::sensor::AdcLightSensor;

/// Board hopper sensor: LED, phototransistor, level output
pub type BoardHopper = HopperSensor<Output<'static>, AdcLightSensor<'static>, Output<'static>>;

/// Hopper measurement task
///
/// Runs measurement cycles forever. Each cycle already spends two LED
/// settle delays, so an interval of 0 still yields to the executor.
#[embassy_executor::task]
pub async fn hopper_task(mut hopper: BoardHopper, interval_ms: u32) {
    info!("Hopper task started");

    let mut delay = Delay;

    loop {
        match hopper.measure(&mut delay, &MEASUREMENTS).await {
            Ok(level) => trace!("Hopper level: {:?}", level),
            Err(e) => warn!("Hopper measurement failed: {:?}", e),
        }

        if interval_ms > 0 {
            Timer::after_millis(interval_ms as u64).await;
        }
    }
}
