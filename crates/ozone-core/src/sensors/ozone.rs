use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, error, info, warn};

use super::{Sensor, SensorError, SensorReadings};
use crate::config::{DEFAULT_WINDOW, SensorConfig};
use crate::error::Error;
use crate::history::{HISTORY_CAPACITY, SampleHistory};
use crate::registers::{
    ADDRESS_0, DATA_LEN, MODE_REGISTER, MeasureMode, SET_PASSIVE_REGISTER, SETTLE_DELAY_MS,
    decode_concentration,
};

/// Returned by [`OzoneSensor::read_averaged`] for a window outside `0..=100`.
pub const INVALID_WINDOW: i16 = -1;

/// Typed readings from the ozone sensor.
pub struct OzoneReadings {
    pub ozone_ppb: i32,
}

impl SensorReadings<1> for OzoneReadings {
    fn to_array(self) -> [i32; 1] {
        [self.ozone_ppb]
    }
}

/// Blocking driver for the I2C ozone sensor.
///
/// Every register access is followed by a fixed 100 ms settle delay, so each
/// reading blocks for roughly 200 ms. The driver keeps the last 100 samples to
/// smooth readings with [`read_averaged`](Self::read_averaged).
///
/// The bus can be owned or borrowed: `embedded-hal` implements [`I2c`] for
/// `&mut T`, so passing `&mut bus` ties the driver's lifetime to the bus.
///
/// Bus failures never surface from the reading methods. A failed probe makes
/// [`begin`](Self::begin) return `false`; a failed data read produces zeroed
/// bytes. Both are logged at `warn` level.
pub struct OzoneSensor<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    mode: MeasureMode,
    history: SampleHistory,
    /// Samples included in the running average, at most the last window
    sample_count: usize,
    /// Window used by [`Sensor::read`]
    window: i32,
}

impl<I2C, D> OzoneSensor<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a new driver. No bus traffic happens until [`begin`](Self::begin).
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: ADDRESS_0,
            mode: MeasureMode::Automatic,
            history: SampleHistory::new(),
            sample_count: 0,
            window: DEFAULT_WINDOW,
        }
    }

    /// Probe the sensor at `address` and remember the address for later calls.
    ///
    /// Sends an empty write and waits the settle delay whatever the outcome.
    ///
    /// # Returns
    /// `true` if the device acknowledged the probe
    pub fn begin(&mut self, address: u8) -> bool {
        self.address = address;
        let found = match self.i2c.write(address, &[]) {
            Ok(()) => true,
            Err(e) => {
                warn!("Ozone sensor at {:#04x} did not respond: {:?}", address, e);
                false
            }
        };
        self.delay.delay_ms(SETTLE_DELAY_MS);

        if found {
            info!("Ozone sensor found at {:#04x}", address);
        }
        found
    }

    /// Apply a full configuration: probe, select the mode and store the window.
    pub fn init(&mut self, config: &SensorConfig) -> Result<(), SensorError> {
        config.validate().map_err(|e| {
            error!("Ozone sensor configuration rejected: {}", e);
            SensorError::InitializationFailed {
                sensor: "Ozone",
                details: "Invalid sensor configuration",
            }
        })?;

        if !self.begin(config.address) {
            return Err(SensorError::InitializationFailed {
                sensor: "Ozone",
                details: "Device did not acknowledge probe",
            });
        }

        self.set_mode(config.mode);
        self.window = config.window;
        Ok(())
    }

    /// Switch the sensor between automatic and passive measurement.
    ///
    /// The mode is not read back; later reads assume the write took effect.
    pub fn set_mode(&mut self, mode: MeasureMode) {
        if let Err(e) = self.write_register(MODE_REGISTER, mode.to_register()) {
            warn!("Ozone mode write failed: {}", e);
        }
        self.delay.delay_ms(SETTLE_DELAY_MS);
        self.mode = mode;
        debug!("Ozone sensor mode set to {:?}", mode);
    }

    /// Like [`set_mode`](Self::set_mode) for a raw register value.
    ///
    /// Values other than `0x00` and `0x01` are ignored: nothing is written and
    /// the current mode is kept.
    pub fn set_mode_raw(&mut self, mode: u8) {
        match MeasureMode::from_register(mode) {
            Some(mode) => self.set_mode(mode),
            None => debug!("Ignoring unknown ozone mode {:#04x}", mode),
        }
    }

    /// Take a new sample and return the mean of the last `window` samples.
    ///
    /// # Returns
    /// - `0` for a window of zero, without touching the bus
    /// - [`INVALID_WINDOW`] for a negative window or one above 100, without
    ///   touching the bus
    /// - otherwise the truncated mean in ppb
    pub fn read_averaged(&mut self, window: i32) -> i16 {
        match self.try_read_averaged(window) {
            Ok(ppb) => ppb,
            Err(e) => {
                debug!("{}", e);
                INVALID_WINDOW
            }
        }
    }

    /// [`read_averaged`](Self::read_averaged) with a typed error for the
    /// window check.
    ///
    /// Until `window` samples have been taken, the mean covers only the
    /// samples seen so far. The count is never reset; asking for a smaller
    /// window clamps it down.
    pub fn try_read_averaged(&mut self, window: i32) -> Result<i16, Error<I2C::Error>> {
        if window == 0 {
            return Ok(0);
        }
        if window < 0 || window > HISTORY_CAPACITY as i32 {
            return Err(Error::InvalidWindow(window));
        }

        let sample = self.sample(self.mode);
        self.history.push(sample);
        self.sample_count = (self.sample_count + 1).min(window as usize);

        Ok(self.history.average(self.sample_count).unwrap_or(0))
    }

    /// Take one sample in `mode` without averaging.
    ///
    /// The sample replaces the newest history entry, so it is also seen by the
    /// next [`read_averaged`](Self::read_averaged) call.
    pub fn read_raw(&mut self, mode: MeasureMode) -> i16 {
        let sample = self.sample(mode);
        self.history.replace_latest(sample);
        sample
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// The last mode written with [`set_mode`](Self::set_mode)
    pub fn mode(&self) -> MeasureMode {
        self.mode
    }

    pub fn window(&self) -> i32 {
        self.window
    }

    /// Number of samples covered by the last average
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    /// Give back the bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    // =========================================================================
    // Private I2C Helper Methods
    // =========================================================================

    /// Trigger a reading for `mode` and fetch the matching register pair.
    fn sample(&mut self, mode: MeasureMode) -> i16 {
        if let Err(e) = self.write_register(SET_PASSIVE_REGISTER, mode.read_command()) {
            warn!("Ozone read trigger failed: {}", e);
        }
        self.delay.delay_ms(SETTLE_DELAY_MS);
        self.read_register(mode.data_register())
    }

    /// Write a single byte to a register
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(self.address, &[reg, value])?;
        Ok(())
    }

    /// Point the device at `reg`, wait, then read the big-endian pair.
    ///
    /// Failed transfers leave the bytes zeroed.
    fn read_register(&mut self, reg: u8) -> i16 {
        if let Err(e) = self.select_register(reg) {
            warn!("Ozone register select {:#04x} failed: {}", reg, e);
        }
        self.delay.delay_ms(SETTLE_DELAY_MS);

        let bytes = self.read_bytes().unwrap_or_else(|e| {
            warn!("Ozone data read from {:#04x} failed: {}", reg, e);
            [0; DATA_LEN]
        });
        decode_concentration(bytes)
    }

    fn select_register(&mut self, reg: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(self.address, &[reg])?;
        Ok(())
    }

    fn read_bytes(&mut self) -> Result<[u8; DATA_LEN], Error<I2C::Error>> {
        let mut buf = [0u8; DATA_LEN];
        self.i2c.read(self.address, &mut buf)?;
        Ok(buf)
    }
}

impl<I2C, D> Sensor<1> for OzoneSensor<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Readings = OzoneReadings;

    fn read(&mut self) -> Result<OzoneReadings, SensorError> {
        let ozone_ppb = self.try_read_averaged(self.window).map_err(|e| {
            error!("Ozone averaged read failed: {}", e);
            SensorError::ReadFailed {
                sensor: "Ozone",
                operation: "average ozone samples",
                details: "Averaging window outside 1..=100",
            }
        })?;

        Ok(OzoneReadings {
            ozone_ppb: ozone_ppb as i32,
        })
    }
}
