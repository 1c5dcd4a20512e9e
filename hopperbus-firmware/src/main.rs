//! Hopperbus - Hopper Sensor Interface Board Firmware
//!
//! Main firmware binary for the STM32F042K6 interface board. The board
//! measures hopper fill level with an LED light barrier, powers up the
//! attached display, and answers a bus master as a two-wire target.
//!
//! Pin assignment:
//!
//! | Pin | Function                         |
//! |-----|----------------------------------|
//! | PA0 | Hopper level output (high=full)  |
//! | PA1 | Phototransistor (ADC_IN1)        |
//! | PA2 | Display 3V3 enable               |
//! | PA3 | Display boost enable             |
//! | PA7 | Hopper LED                       |
//! | PB0 | Display reset (open drain)       |
//! | PB6 | I2C1 SCL                         |
//! | PB7 | I2C1 SDA                         |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::adc::{self, Adc, AdcChannel, SampleTime};
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Level, Output, OutputOpenDrain, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::peripherals::{ADC1, I2C1};
use embassy_time::{Delay, Duration};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hopperbus_core::display::DisplayPower;
use hopperbus_core::hopper::HopperSensor;
use hopperbus_hal::TargetAddress;
use hopperbus_hal_stm32f0::{target_config, IndependentWatchdog};

mod channels;
mod config;
mod sensor;
mod tasks;

use crate::sensor::AdcLightSensor;

bind_interrupts!(struct Irqs {
    I2C1 => i2c::EventInterruptHandler<I2C1>, i2c::ErrorInterruptHandler<I2C1>;
    ADC1 => adc::InterruptHandler<ADC1>;
});

/// Board display power pins: reset, 3V3 enable, boost enable
type DisplayPins = DisplayPower<OutputOpenDrain<'static>, Output<'static>, Output<'static>>;

/// Display power pins stay driven for the lifetime of the firmware
static DISPLAY_POWER: StaticCell<DisplayPins> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Hopperbus firmware starting...");

    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();

    // Reset is held low until the supply is up
    let display = DISPLAY_POWER.init(DisplayPower::new(
        OutputOpenDrain::new(p.PB0, Level::Low, Speed::Low),
        Output::new(p.PA2, Level::Low, Speed::Low),
        Output::new(p.PA3, Level::Low, Speed::Low),
    ));
    if let Err(e) = display.power_up(&mut Delay).await {
        error!("Display power-up failed: {:?}", e);
    }

    // Hopper light barrier
    let mut adc = Adc::new(p.ADC1, Irqs);
    adc.set_sample_time(SampleTime::CYCLES71_5);
    let light = AdcLightSensor::new(adc, p.PA1.degrade_adc());

    let hopper = HopperSensor::new(
        Output::new(p.PA7, Level::Low, Speed::Low),
        light,
        Output::new(p.PA0, Level::High, Speed::Low),
    )
    .with_threshold(config.hopper_threshold)
    .with_settle_ms(config.led_settle_ms);

    info!("Hopper sensor initialized");

    // Bus target
    let address = match TargetAddress::new(config.bus_address) {
        Ok(address) => address,
        Err(e) => {
            warn!("Bus address {=u8:#x} unusable ({:?}), using default", config.bus_address, e);
            TargetAddress::default()
        }
    };

    let mut i2c_config = i2c::Config::default();
    i2c_config.timeout = Duration::from_millis(100);

    let i2c = I2c::new(
        p.I2C1, p.PB6, p.PB7, Irqs, p.DMA1_CH2, p.DMA1_CH3, i2c_config,
    )
    .into_slave_multimaster(target_config(address.current()));

    info!("Bus target listening on {=u8:#x}", address.current());

    let watchdog = IndependentWatchdog::new(p.IWDG);

    spawner
        .spawn(tasks::bus_task(i2c, watchdog, address, config.reset_timeout))
        .unwrap();
    spawner
        .spawn(tasks::hopper_task(hopper, config.measure_interval_ms))
        .unwrap();

    info!("All tasks spawned");
}
