mod ozone;
#[cfg(feature = "async")]
mod ozone_async;

use thiserror_no_std::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor} initialization failed: {details}")]
    InitializationFailed {
        sensor: &'static str,
        details: &'static str,
    },

    #[error("{sensor} failed to {operation}: {details}")]
    ReadFailed {
        sensor: &'static str,
        operation: &'static str,
        details: &'static str,
    },
}

/// Trait for sensor reading data structures.
/// Provides compile-time guarantees about the number of values and their conversion to arrays.
pub trait SensorReadings<const COUNT: usize> {
    /// Convert the readings into a fixed-size array.
    fn to_array(self) -> [i32; COUNT];
}

/// Trait for blocking sensors that produce typed readings.
pub trait Sensor<const COUNT: usize> {
    /// The type of readings this sensor produces.
    type Readings: SensorReadings<COUNT>;

    /// Read the sensor and return typed readings.
    fn read(&mut self) -> Result<Self::Readings, SensorError>;
}

/// Async counterpart of [`Sensor`].
#[cfg(feature = "async")]
pub trait AsyncSensor<const COUNT: usize> {
    type Readings: SensorReadings<COUNT>;

    fn read(&mut self) -> impl Future<Output = Result<Self::Readings, SensorError>>;
}

pub use ozone::{INVALID_WINDOW, OzoneReadings, OzoneSensor};
#[cfg(feature = "async")]
pub use ozone_async::OzoneSensorAsync;
