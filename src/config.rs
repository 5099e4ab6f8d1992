//! Driver configuration and the derived echo timeout.

use crate::consts;
use crate::error::{Error, Result};
use std::time::Duration;

/// Immutable settings for one Octosonar board.
///
/// Build with [`OctosonarConfig::new`] and the `with_*` methods; everything
/// not set falls back to the board's factory defaults (address `0x3D`,
/// 400 cm range, 1 ms poll interval).
#[derive(Debug, Clone, PartialEq)]
pub struct OctosonarConfig {
    /// I2C bus number.
    pub bus: u8,
    /// 7-bit I2C address of the board.
    pub address: u8,
    /// GPIO connected to the board's INT pin (BCM numbering on a Raspberry Pi).
    pub interrupt_pin: u8,
    /// Maximum sonar range in centimetres; bounds the wait for an echo.
    pub max_range_cm: f64,
    /// How often the read loop checks for a finished pulse.
    pub poll_interval: Duration,
}

impl OctosonarConfig {
    /// Creates a configuration with default address, range, and poll interval.
    pub fn new(bus: u8, interrupt_pin: u8) -> Self {
        Self {
            bus,
            address: consts::DEFAULT_ADDRESS,
            interrupt_pin,
            max_range_cm: consts::DEFAULT_MAX_RANGE_CM,
            poll_interval: consts::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the board's 7-bit I2C address.
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Sets the maximum sonar range, which bounds the echo timeout.
    pub fn with_max_range_cm(mut self, max_range_cm: f64) -> Self {
        self.max_range_cm = max_range_cm;
        self
    }

    /// Sets how often the read loop checks for a finished pulse.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Checks every field; `Octosonar::setup` calls this before touching hardware.
    pub fn validate(&self) -> Result<()> {
        if self.address > 0x7F {
            return Err(Error::ArgumentOutOfRange(format!(
                "7-bit I2C address 0x{:02X} out of range (0x00-0x7F)",
                self.address
            )));
        }
        if !self.max_range_cm.is_finite() || self.max_range_cm <= 0.0 {
            return Err(Error::ArgumentOutOfRange(format!(
                "Maximum range {} cm must be a positive number",
                self.max_range_cm
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::ArgumentOutOfRange(
                "Poll interval must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Round-trip time of sound over `max_range_cm`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64((2.0 * self.max_range_cm / 100.0) / consts::SPEED_OF_SOUND_M_PER_S)
    }
}

impl Default for OctosonarConfig {
    /// Bus 1, interrupt on GPIO 25 as wired on the reference Raspberry Pi setup.
    fn default() -> Self {
        Self::new(consts::DEFAULT_BUS, 25)
    }
}
