//! Environment sensor trait

/// Errors that can occur with the environment sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// I2C transfer failed
    Bus,
    /// Chip ID did not match
    NotFound,
    /// No sensor fitted
    Absent,
}

/// Temperature and barometric pressure
pub trait EnvSensor {
    /// Temperature with 0.1°C resolution, 215 = 21.5°C
    fn read_temperature_x10(&mut self) -> Result<i16, SensorError>;

    /// Station pressure in pascal
    fn read_pressure_pa(&mut self) -> Result<u32, SensorError>;
}

/// Stand-in for boards without a sensor
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSensor;

impl EnvSensor for NoSensor {
    fn read_temperature_x10(&mut self) -> Result<i16, SensorError> {
        Err(SensorError::Absent)
    }

    fn read_pressure_pa(&mut self) -> Result<u32, SensorError> {
        Err(SensorError::Absent)
    }
}
