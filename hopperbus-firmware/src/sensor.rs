//! ADC-backed phototransistor reading

use embassy_stm32::adc::{Adc, AnyAdcChannel};
use embassy_stm32::peripherals::ADC1;

use hopperbus_core::traits::{LightSensor, SensorError};

/// Largest 12-bit conversion result
const ADC_MAX: u16 = 4095;

/// Phototransistor on an ADC1 channel
pub struct AdcLightSensor<'d> {
    adc: Adc<'d, ADC1>,
    channel: AnyAdcChannel<ADC1>,
}

impl<'d> AdcLightSensor<'d> {
    pub fn new(adc: Adc<'d, ADC1>, channel: AnyAdcChannel<ADC1>) -> Self {
        Self { adc, channel }
    }
}

impl LightSensor for AdcLightSensor<'_> {
    async fn read_raw(&mut self) -> Result<u16, SensorError> {
        let raw = self.adc.read(&mut self.channel).await;
        if raw > ADC_MAX {
            return Err(SensorError::OutOfRange);
        }
        Ok(raw)
    }
}
