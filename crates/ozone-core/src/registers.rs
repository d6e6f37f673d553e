//! Register map and protocol constants for the ozone sensor.

// =============================================================================
// I2C Addresses
// =============================================================================

/// Address with both address-select jumpers open (factory default)
pub const ADDRESS_0: u8 = 0x70;
pub const ADDRESS_1: u8 = 0x71;
pub const ADDRESS_2: u8 = 0x72;
pub const ADDRESS_3: u8 = 0x73;

/// All selectable device addresses, in jumper order
pub const DEFAULT_ADDRESSES: [u8; 4] = [ADDRESS_0, ADDRESS_1, ADDRESS_2, ADDRESS_3];

// =============================================================================
// Register Addresses
// =============================================================================

/// Measurement mode select
pub const MODE_REGISTER: u8 = 0x03;
/// Read trigger; written before every data read
pub const SET_PASSIVE_REGISTER: u8 = 0x04;

/// Passive-mode concentration, high byte
pub const PASS_DATA_HIGH_REGISTER: u8 = 0x07;
/// Passive-mode concentration, low byte
pub const PASS_DATA_LOW_REGISTER: u8 = 0x08;
/// Automatic-mode concentration, high byte
pub const AUTO_DATA_HIGH_REGISTER: u8 = 0x09;
/// Automatic-mode concentration, low byte
pub const AUTO_DATA_LOW_REGISTER: u8 = 0x0A;

// =============================================================================
// Command Values
// =============================================================================

/// Trigger value for an automatic-mode read
pub const AUTO_READ_DATA: u8 = 0x00;
/// Trigger value for a passive-mode read (request, then read)
pub const PASSIVE_READ_DATA: u8 = 0x01;

// =============================================================================
// Timing and Sizing
// =============================================================================

/// Settle delay after every register write and before every read
pub const SETTLE_DELAY_MS: u32 = 100;

/// Number of bytes in one concentration reading
pub const DATA_LEN: usize = 2;

// =============================================================================
// Enums
// =============================================================================

/// Measurement mode of the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum MeasureMode {
    /// The sensor measures continuously; reads return the latest value
    #[default]
    Automatic = 0x00,
    /// The sensor measures only when asked to
    Passive = 0x01,
}

impl MeasureMode {
    /// Convert from raw register value
    pub fn from_register(val: u8) -> Option<Self> {
        match val {
            0x00 => Some(Self::Automatic),
            0x01 => Some(Self::Passive),
            _ => None,
        }
    }

    /// Convert to register value
    pub fn to_register(self) -> u8 {
        self as u8
    }

    /// Value written to [`SET_PASSIVE_REGISTER`] before a read in this mode
    pub fn read_command(self) -> u8 {
        match self {
            Self::Automatic => AUTO_READ_DATA,
            Self::Passive => PASSIVE_READ_DATA,
        }
    }

    /// First register of the concentration pair read in this mode
    pub fn data_register(self) -> u8 {
        match self {
            Self::Automatic => AUTO_DATA_HIGH_REGISTER,
            Self::Passive => PASS_DATA_HIGH_REGISTER,
        }
    }
}

impl TryFrom<u8> for MeasureMode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_register(value).ok_or(value)
    }
}

/// Combine a big-endian register pair into a signed concentration value.
#[inline]
pub fn decode_concentration(bytes: [u8; DATA_LEN]) -> i16 {
    i16::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_big_endian_pair() {
        assert_eq!(decode_concentration([0x01, 0x2C]), 300);
        assert_eq!(decode_concentration([0x00, 0x64]), 100);
    }

    #[test]
    fn test_decode_sign_extends() {
        assert_eq!(decode_concentration([0xFF, 0xFF]), -1);
        assert_eq!(decode_concentration([0x80, 0x00]), i16::MIN);
    }

    #[test]
    fn test_mode_registers() {
        assert_eq!(MeasureMode::Automatic.read_command(), 0x00);
        assert_eq!(MeasureMode::Automatic.data_register(), 0x09);
        assert_eq!(MeasureMode::Passive.read_command(), 0x01);
        assert_eq!(MeasureMode::Passive.data_register(), 0x07);
    }

    #[test]
    fn test_mode_from_register_rejects_unknown() {
        assert_eq!(MeasureMode::from_register(0), Some(MeasureMode::Automatic));
        assert_eq!(MeasureMode::from_register(1), Some(MeasureMode::Passive));
        assert_eq!(MeasureMode::try_from(2), Err(2));
        assert_eq!(MeasureMode::default(), MeasureMode::Automatic);
    }
}
