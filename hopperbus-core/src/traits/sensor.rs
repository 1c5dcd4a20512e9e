//! Light sensor trait

/// Errors that can occur while reading the light sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion error
    ConversionError,
    /// Reading out of the converter's range
    OutOfRange,
}

/// Phototransistor behind an ADC channel
///
/// Lower readings mean more light.
pub trait LightSensor {
    /// Read the raw ADC value
    ///
    /// Takes `&mut self` because ADC reads require mutable access.
    fn read_raw(&mut self) -> impl core::future::Future<Output = Result<u16, SensorError>>;
}
