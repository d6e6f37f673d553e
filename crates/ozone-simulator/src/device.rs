//! In-memory ozone sensor that answers on an `embedded-hal` I2C bus.

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use log::debug;

use ozone_core::MeasureMode;
use ozone_core::registers::{
    AUTO_DATA_HIGH_REGISTER, MODE_REGISTER, PASS_DATA_HIGH_REGISTER, PASSIVE_READ_DATA,
    SET_PASSIVE_REGISTER,
};

/// Registers 0x00 through 0x0F.
const REGISTER_COUNT: usize = 16;

/// Simulated seconds between two measurements.
const MEASUREMENT_STEP_SECS: f64 = 2.0;

/// Generates a slowly varying ozone concentration in ppb.
pub struct OzoneWaveform {
    elapsed_secs: f64,
}

impl OzoneWaveform {
    pub fn new() -> Self {
        Self { elapsed_secs: 0.0 }
    }

    /// Advance the internal clock and return the next concentration.
    pub fn next_ppb(&mut self) -> i16 {
        self.elapsed_secs += MEASUREMENT_STEP_SECS;
        let t = self.elapsed_secs;

        // 20-70 ppb: a daily-style swell with faster jitter on top
        let ppb = 45.0 + 20.0 * (t / 90.0).sin() + 5.0 * (t / 13.0).cos();
        ppb.round() as i16
    }
}

/// Register-level model of the sensor.
///
/// - Only its own address is acknowledged.
/// - A write of `[reg]` moves the register pointer; `[reg, value]` also
///   stores `value`.
/// - In automatic mode every read trigger refreshes the automatic data pair.
/// - In passive mode the passive pair only changes when `0x01` is written to
///   the trigger register.
/// - Reads return consecutive registers from the pointer, zero past the end.
pub struct SimulatedOzoneDevice {
    address: u8,
    mode: MeasureMode,
    pointer: u8,
    registers: [u8; REGISTER_COUNT],
    waveform: OzoneWaveform,
}

impl SimulatedOzoneDevice {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            mode: MeasureMode::Automatic,
            pointer: 0,
            registers: [0; REGISTER_COUNT],
            waveform: OzoneWaveform::new(),
        }
    }

    pub fn mode(&self) -> MeasureMode {
        self.mode
    }

    fn store_pair(&mut self, high: u8, value: i16) {
        let [hi, lo] = value.to_be_bytes();
        self.registers[high as usize] = hi;
        self.registers[high as usize + 1] = lo;
    }

    fn handle_write(&mut self, bytes: &[u8]) {
        let Some((&reg, data)) = bytes.split_first() else {
            // Empty write: address probe
            return;
        };
        self.pointer = reg;

        let Some(&value) = data.first() else {
            return;
        };
        if let Some(slot) = self.registers.get_mut(reg as usize) {
            *slot = value;
        }

        match reg {
            MODE_REGISTER => {
                if let Some(mode) = MeasureMode::from_register(value) {
                    debug!("Simulated sensor switched to {:?}", mode);
                    self.mode = mode;
                }
            }
            SET_PASSIVE_REGISTER => match self.mode {
                MeasureMode::Automatic => {
                    let ppb = self.waveform.next_ppb();
                    self.store_pair(AUTO_DATA_HIGH_REGISTER, ppb);
                }
                MeasureMode::Passive if value == PASSIVE_READ_DATA => {
                    let ppb = self.waveform.next_ppb();
                    self.store_pair(PASS_DATA_HIGH_REGISTER, ppb);
                }
                MeasureMode::Passive => {}
            },
            _ => {}
        }
    }

    fn handle_read(&mut self, buf: &mut [u8]) {
        for (offset, byte) in buf.iter_mut().enumerate() {
            *byte = self
                .registers
                .get(self.pointer as usize + offset)
                .copied()
                .unwrap_or(0);
        }
    }
}

impl ErrorType for SimulatedOzoneDevice {
    type Error = ErrorKind;
}

impl I2c for SimulatedOzoneDevice {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.handle_write(bytes),
                Operation::Read(buf) => self.handle_read(buf),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_pair(device: &mut SimulatedOzoneDevice, reg: u8) -> i16 {
        let mut buf = [0u8; 2];
        device.write(0x70, &[reg]).unwrap();
        device.read(0x70, &mut buf).unwrap();
        i16::from_be_bytes(buf)
    }

    #[test]
    fn test_only_own_address_acks() {
        let mut device = SimulatedOzoneDevice::new(0x70);
        assert!(device.write(0x70, &[]).is_ok());
        assert_eq!(
            device.write(0x71, &[]),
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
        );
    }

    #[test]
    fn test_mode_register() {
        let mut device = SimulatedOzoneDevice::new(0x70);
        device.write(0x70, &[0x03, 0x01]).unwrap();
        assert_eq!(device.mode(), MeasureMode::Passive);

        device.write(0x70, &[0x03, 0x09]).unwrap();
        assert_eq!(device.mode(), MeasureMode::Passive);
    }

    #[test]
    fn test_automatic_trigger_refreshes_auto_pair() {
        let mut device = SimulatedOzoneDevice::new(0x70);
        device.write(0x70, &[0x04, 0x00]).unwrap();
        let first = read_pair(&mut device, 0x09);
        assert!((20..=70).contains(&first));
        assert_eq!(read_pair(&mut device, 0x07), 0);
    }

    #[test]
    fn test_passive_pair_latches_on_request_only() {
        let mut device = SimulatedOzoneDevice::new(0x70);
        device.write(0x70, &[0x03, 0x01]).unwrap();

        device.write(0x70, &[0x04, 0x00]).unwrap();
        assert_eq!(read_pair(&mut device, 0x07), 0);

        device.write(0x70, &[0x04, 0x01]).unwrap();
        let latched = read_pair(&mut device, 0x07);
        assert_ne!(latched, 0);
        assert_eq!(read_pair(&mut device, 0x07), latched);
    }

    #[test]
    fn test_read_past_end_is_zero() {
        let mut device = SimulatedOzoneDevice::new(0x70);
        let mut buf = [0xFFu8; 2];
        device.write(0x70, &[0x0F]).unwrap();
        device.read(0x70, &mut buf).unwrap();
        assert_eq!(buf, [0x00, 0x00]);
    }
}
