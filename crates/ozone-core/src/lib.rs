//! Driver for the I2C ozone concentration sensor (addresses 0x70-0x73)
//!
//! The sensor reports ozone in parts per billion through a pair of big-endian
//! registers. It runs either in automatic mode, measuring continuously, or in
//! passive mode, measuring on request. [`OzoneSensor`] wraps the register
//! protocol and keeps a 100-sample history for moving averages.
//!
//! It is `#![no_std]` so it compiles on embedded targets and desktop hosts (for
//! the simulator and tests). The blocking driver sits on `embedded-hal` 1.0;
//! the `async` feature adds [`OzoneSensorAsync`] on `embedded-hal-async`.
//!
//! ```ignore
//! let mut sensor = OzoneSensor::new(i2c, delay);
//! if sensor.begin(registers::ADDRESS_0) {
//!     sensor.set_mode(MeasureMode::Passive);
//!     let ppb = sensor.read_averaged(DEFAULT_WINDOW);
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod history;
pub mod registers;
pub mod sensors;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{ConfigError, DEFAULT_WINDOW, SensorConfig};
pub use error::Error;
pub use history::{HISTORY_CAPACITY, SampleHistory};
pub use registers::MeasureMode;
pub use sensors::{INVALID_WINDOW, OzoneReadings, OzoneSensor, Sensor, SensorError, SensorReadings};
#[cfg(feature = "async")]
pub use sensors::{AsyncSensor, OzoneSensorAsync};
