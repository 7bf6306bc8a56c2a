//! Temperature sensor trait

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// No device answered at the expected address, or the ID did not match
    NotFound,
    /// Bus transaction failed
    Bus,
    /// Reading out of the sensor's rated range
    OutOfRange,
}

/// Trait for temperature sensors
///
/// Implementations handle the specific sensor type (ADT7410, thermistor, ...).
pub trait TemperatureSensor {
    /// Read the current temperature in degrees Celsius
    ///
    /// Returns a fixed-point value with 1/128°C resolution.
    /// For example, 21.5°C is returned as 2752.
    fn read_celsius_x128(&mut self) -> Result<i16, SensorError>;
}
