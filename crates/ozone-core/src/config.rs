use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::history::HISTORY_CAPACITY;
use crate::registers::{ADDRESS_0, DEFAULT_ADDRESSES, MeasureMode};

/// Number of samples averaged when no window is given.
pub const DEFAULT_WINDOW: i32 = 20;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("address {address:#04x} is not one of 0x70-0x73")]
    UnsupportedAddress { address: u8 },

    #[error("averaging window {window} outside 1..={max}")]
    WindowOutOfRange { window: i32, max: usize },
}

/// Startup settings for one ozone sensor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorConfig {
    pub address: u8,
    pub mode: MeasureMode,
    /// Samples averaged by [`Sensor::read`](crate::sensors::Sensor::read)
    pub window: i32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            address: ADDRESS_0,
            mode: MeasureMode::Automatic,
            window: DEFAULT_WINDOW,
        }
    }
}

impl SensorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !DEFAULT_ADDRESSES.contains(&self.address) {
            return Err(ConfigError::UnsupportedAddress {
                address: self.address,
            });
        }

        if self.window < 1 || self.window > HISTORY_CAPACITY as i32 {
            return Err(ConfigError::WindowOutOfRange {
                window: self.window,
                max: HISTORY_CAPACITY,
            });
        }

        Ok(())
    }
}
