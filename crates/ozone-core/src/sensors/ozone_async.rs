use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use log::{debug, error, info, warn};

use super::{AsyncSensor, INVALID_WINDOW, OzoneReadings, SensorError};
use crate::config::{DEFAULT_WINDOW, SensorConfig};
use crate::error::Error;
use crate::history::{HISTORY_CAPACITY, SampleHistory};
use crate::registers::{
    ADDRESS_0, DATA_LEN, MODE_REGISTER, MeasureMode, SET_PASSIVE_REGISTER, SETTLE_DELAY_MS,
    decode_concentration,
};

/// Async driver for the I2C ozone sensor.
///
/// Same protocol and averaging as [`OzoneSensor`](super::OzoneSensor); the
/// settle delays and transfers yield to the executor instead of blocking.
pub struct OzoneSensorAsync<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    mode: MeasureMode,
    history: SampleHistory,
    sample_count: usize,
    window: i32,
}

impl<I2C, D> OzoneSensorAsync<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
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

    /// Probe the sensor at `address`; `true` if it acknowledged.
    pub async fn begin(&mut self, address: u8) -> bool {
        self.address = address;
        let found = match self.i2c.write(address, &[]).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Ozone sensor at {:#04x} did not respond: {:?}", address, e);
                false
            }
        };
        self.delay.delay_ms(SETTLE_DELAY_MS).await;

        if found {
            info!("Ozone sensor found at {:#04x}", address);
        }
        found
    }

    pub async fn init(&mut self, config: &SensorConfig) -> Result<(), SensorError> {
        config.validate().map_err(|e| {
            error!("Ozone sensor configuration rejected: {}", e);
            SensorError::InitializationFailed {
                sensor: "Ozone",
                details: "Invalid sensor configuration",
            }
        })?;

        if !self.begin(config.address).await {
            return Err(SensorError::InitializationFailed {
                sensor: "Ozone",
                details: "Device did not acknowledge probe",
            });
        }

        self.set_mode(config.mode).await;
        self.window = config.window;
        Ok(())
    }

    pub async fn set_mode(&mut self, mode: MeasureMode) {
        if let Err(e) = self.write_register(MODE_REGISTER, mode.to_register()).await {
            warn!("Ozone mode write failed: {}", e);
        }
        self.delay.delay_ms(SETTLE_DELAY_MS).await;
        self.mode = mode;
        debug!("Ozone sensor mode set to {:?}", mode);
    }

    /// Unknown values are ignored without bus traffic.
    pub async fn set_mode_raw(&mut self, mode: u8) {
        match MeasureMode::from_register(mode) {
            Some(mode) => self.set_mode(mode).await,
            None => debug!("Ignoring unknown ozone mode {:#04x}", mode),
        }
    }

    /// See [`OzoneSensor::read_averaged`](super::OzoneSensor::read_averaged).
    pub async fn read_averaged(&mut self, window: i32) -> i16 {
        match self.try_read_averaged(window).await {
            Ok(ppb) => ppb,
            Err(e) => {
                debug!("{}", e);
                INVALID_WINDOW
            }
        }
    }

    pub async fn try_read_averaged(&mut self, window: i32) -> Result<i16, Error<I2C::Error>> {
        if window == 0 {
            return Ok(0);
        }
        if window < 0 || window > HISTORY_CAPACITY as i32 {
            return Err(Error::InvalidWindow(window));
        }

        let sample = self.sample(self.mode).await;
        self.history.push(sample);
        self.sample_count = (self.sample_count + 1).min(window as usize);

        Ok(self.history.average(self.sample_count).unwrap_or(0))
    }

    pub async fn read_raw(&mut self, mode: MeasureMode) -> i16 {
        let sample = self.sample(mode).await;
        self.history.replace_latest(sample);
        sample
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn mode(&self) -> MeasureMode {
        self.mode
    }

    pub fn window(&self) -> i32 {
        self.window
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    async fn sample(&mut self, mode: MeasureMode) -> i16 {
        if let Err(e) = self
            .write_register(SET_PASSIVE_REGISTER, mode.read_command())
            .await
        {
            warn!("Ozone read trigger failed: {}", e);
        }
        self.delay.delay_ms(SETTLE_DELAY_MS).await;
        self.read_register(mode.data_register()).await
    }

    async fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(self.address, &[reg, value]).await?;
        Ok(())
    }

    async fn read_register(&mut self, reg: u8) -> i16 {
        if let Err(e) = self.i2c.write(self.address, &[reg]).await {
            warn!("Ozone register select {:#04x} failed: {:?}", reg, e);
        }
        self.delay.delay_ms(SETTLE_DELAY_MS).await;

        let mut buf = [0u8; DATA_LEN];
        if let Err(e) = self.i2c.read(self.address, &mut buf).await {
            warn!("Ozone data read from {:#04x} failed: {:?}", reg, e);
            buf = [0; DATA_LEN];
        }
        decode_concentration(buf)
    }
}

impl<I2C, D> AsyncSensor<1> for OzoneSensorAsync<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Readings = OzoneReadings;

    async fn read(&mut self) -> Result<OzoneReadings, SensorError> {
        let ozone_ppb = self.try_read_averaged(self.window).await.map_err(|e| {
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
