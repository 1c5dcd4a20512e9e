//! Independent watchdog (IWDG) for STM32F0
//!
//! The IWDG runs from the 40 kHz LSI and cannot be stopped once started,
//! so arming it is a one-way trip to a device reset.

use embassy_stm32::peripherals::IWDG;
use embassy_stm32::wdg;
use embassy_stm32::Peri;

use hopperbus_hal::{Watchdog, WatchdogTimeout};

/// Watchdog that stays idle until armed
pub struct IndependentWatchdog<'d> {
    iwdg: Peri<'d, IWDG>,
}

impl<'d> IndependentWatchdog<'d> {
    pub fn new(iwdg: Peri<'d, IWDG>) -> Self {
        Self { iwdg }
    }
}

impl Watchdog for IndependentWatchdog<'_> {
    fn arm(&mut self, timeout: WatchdogTimeout) {
        let mut dog = wdg::IndependentWatchdog::new(self.iwdg.reborrow(), timeout.as_micros());
        dog.unleash();
    }

    fn wait_for_reset(&mut self) -> ! {
        loop {
            cortex_m::asm::nop();
        }
    }
}
