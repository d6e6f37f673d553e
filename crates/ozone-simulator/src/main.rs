//! Desktop simulator for the ozone sensor driver.
//!
//! Runs [`OzoneSensor`] against [`SimulatedOzoneDevice`], an in-memory sensor
//! on a fake I2C bus, and logs raw and averaged readings.
//!
//! # Environment
//!
//! | Variable               | Default     | Meaning                                   |
//! |------------------------|-------------|-------------------------------------------|
//! | `OZONE_ADDRESS`        | `0x70`      | Address the driver probes                 |
//! | `OZONE_DEVICE_ADDRESS` | same        | Address the simulated sensor answers on   |
//! | `OZONE_MODE`           | `automatic` | `automatic`/`passive` (or `0`/`1`)        |
//! | `OZONE_WINDOW`         | `20`        | Averaging window, 1-100                   |
//! | `OZONE_SAMPLES`        | `30`        | Number of averaged readings to take       |
//! | `OZONE_TIME_SCALE`     | `0.05`      | Multiplier applied to every settle delay  |
//!
//! Set `RUST_LOG=debug` to see driver-level logging.

mod device;

use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use ozone_core::{MeasureMode, OzoneSensor, Sensor, SensorConfig};

use device::SimulatedOzoneDevice;

const DEFAULT_SAMPLES: u32 = 30;
const DEFAULT_TIME_SCALE: f64 = 0.05;

// ---------------------------------------------------------------------------
// Delay
// ---------------------------------------------------------------------------

/// `thread::sleep` delay, scaled so runs need not take real sensor time.
struct StdDelay {
    scale: f64,
}

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        let scaled = (ns as f64 * self.scale) as u64;
        if scaled > 0 {
            std::thread::sleep(Duration::from_nanos(scaled));
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Parse a byte given as decimal or `0x`-prefixed hex.
fn parse_address(value: &str) -> Option<u8> {
    let value = value.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

fn parse_mode(value: &str) -> Option<MeasureMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "automatic" | "auto" | "0" => Some(MeasureMode::Automatic),
        "passive" | "1" => Some(MeasureMode::Passive),
        _ => None,
    }
}

/// Read `name` from the environment, falling back to `default` when unset or
/// unparsable.
fn env_or<T>(name: &str, default: T, parse: impl Fn(&str) -> Option<T>) -> T {
    match std::env::var(name) {
        Ok(raw) => parse(&raw).unwrap_or_else(|| {
            warn!("Ignoring invalid {}={:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}

fn parse_from_str<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

fn load_config() -> SensorConfig {
    let defaults = SensorConfig::default();
    SensorConfig {
        address: env_or("OZONE_ADDRESS", defaults.address, parse_address),
        mode: env_or("OZONE_MODE", defaults.mode, parse_mode),
        window: env_or("OZONE_WINDOW", defaults.window, parse_from_str),
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    env_logger::init();
    info!("Starting ozone sensor simulator");

    let config = load_config();
    let device_address = env_or("OZONE_DEVICE_ADDRESS", config.address, parse_address);
    let samples: u32 = env_or("OZONE_SAMPLES", DEFAULT_SAMPLES, parse_from_str);
    let scale: f64 = env_or("OZONE_TIME_SCALE", DEFAULT_TIME_SCALE, parse_from_str);

    info!(
        "Driver: address {:#04x}, {:?} mode, window {}; simulated sensor at {:#04x}",
        config.address, config.mode, config.window, device_address
    );

    let device = SimulatedOzoneDevice::new(device_address);
    let mut sensor = OzoneSensor::new(device, StdDelay { scale });

    if let Err(e) = sensor.init(&config) {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    for n in 1..=samples {
        match sensor.read() {
            Ok(readings) => info!(
                "#{:>3}  latest {:>4} ppb  average {:>4} ppb  ({} samples)",
                n,
                sensor.history().latest().unwrap_or(0),
                readings.ozone_ppb,
                sensor.sample_count()
            ),
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let mode = sensor.mode();
    let raw = sensor.read_raw(mode);
    info!("Unfiltered {:?} reading: {} ppb", mode, raw);

    let (device, _) = sensor.release();
    info!("Simulator exiting (device left in {:?} mode)", device.mode());
    ExitCode::SUCCESS
}
