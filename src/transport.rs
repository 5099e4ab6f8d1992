//! I2C transport abstraction and the Octosonar trigger sequence.

use crate::channel::Channel;
use crate::consts::register;
use crate::error::Result;
use std::fmt;
use std::time::Duration;

/// Opaque identifier for an open I2C device connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(pub u32);

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle {}", self.0)
    }
}

/// One step of a composite ("zip") I2C transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZipStep {
    /// Address all following steps to this 7-bit slave address.
    SetAddress(u8),
    /// Write the bytes in one I2C message.
    Write(Vec<u8>),
    /// Read this many bytes; they are appended to the transaction result.
    Read(usize),
    /// Pause before the next step.
    Delay(Duration),
}

/// Access to an I2C bus as the driver needs it.
///
/// Implementations own every handle they hand out. A handle passed to
/// [`close`](Transport::close) must not be used again.
pub trait Transport {
    /// Opens `address` on `bus`.
    fn open(&mut self, bus: u8, address: u8) -> Result<DeviceHandle>;

    /// Writes a single byte to the device.
    fn write_byte(&mut self, handle: DeviceHandle, byte: u8) -> Result<()>;

    /// Runs all steps in order as one call and returns any bytes read.
    fn transaction(&mut self, handle: DeviceHandle, steps: &[ZipStep]) -> Result<Vec<u8>>;

    /// Closes the handle.
    fn close(&mut self, handle: DeviceHandle) -> Result<()>;
}

/// Steps that fire one ping on `channel`.
///
/// Raising the channel's output starts the sonar's trigger pulse; clearing
/// the register afterwards leaves the shared INT line to the echo.
pub fn trigger_sequence(address: u8, channel: Channel) -> [ZipStep; 3] {
    [
        ZipStep::SetAddress(address),
        ZipStep::Write(vec![channel.mask()]),
        ZipStep::Write(vec![register::DESELECT_ALL]),
    ]
}
