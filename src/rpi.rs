//! Raspberry Pi backend built on `rppal`.
//!
//! `RppalI2c` talks to `/dev/i2c-*`, `RppalGpio` delivers INT-pin edges
//! from rppal's interrupt thread.

use crate::config::OctosonarConfig;
use crate::error::{Error, Result};
use crate::notifier::{EdgeCallback, EdgeEvent, EdgeNotifier, Level, Registration, Tick};
use crate::sonar::Octosonar;
use crate::transport::{DeviceHandle, Transport, ZipStep};
use log::{debug, trace};
use rppal::gpio::{self, Gpio, InputPin, Trigger};
use rppal::i2c::I2c;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;

/// Octosonar driven through the Pi's own I2C bus and GPIO header.
pub type RpiOctosonar = Octosonar<RppalI2c, RppalGpio>;

/// Opens the board described by `config` using rppal for both I2C and GPIO.
pub fn setup(config: OctosonarConfig) -> Result<RpiOctosonar> {
    Octosonar::setup(RppalI2c::new(), RppalGpio::new()?, config)
}

/// I2C transport backed by `rppal::i2c::I2c`, one bus connection per handle.
#[derive(Default)]
pub struct RppalI2c {
    devices: HashMap<u32, I2c>,
    next_handle: u32,
}

impl RppalI2c {
    pub fn new() -> Self {
        Self::default()
    }

    fn device(&mut self, handle: DeviceHandle) -> Result<&mut I2c> {
        self.devices.get_mut(&handle.0).ok_or(Error::HandleClosed)
    }
}

impl Transport for RppalI2c {
    fn open(&mut self, bus: u8, address: u8) -> Result<DeviceHandle> {
        let mut i2c = I2c::with_bus(bus)?;
        i2c.set_slave_address(u16::from(address))?;
        let handle = DeviceHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.devices.insert(handle.0, i2c);
        debug!("Opened I2C bus {} address 0x{:02X} as {}", bus, address, handle);
        Ok(handle)
    }

    fn write_byte(&mut self, handle: DeviceHandle, byte: u8) -> Result<()> {
        let i2c = self.device(handle)?;
        i2c.smbus_send_byte(byte)?;
        Ok(())
    }

    fn transaction(&mut self, handle: DeviceHandle, steps: &[ZipStep]) -> Result<Vec<u8>> {
        let i2c = self.device(handle)?;
        let mut read = Vec::new();
        for step in steps {
            trace!("I2C step {:02X?}", step);
            match step {
                ZipStep::SetAddress(address) => i2c.set_slave_address(u16::from(*address))?,
                ZipStep::Write(bytes) => {
                    let written = i2c.write(bytes)?;
                    if written != bytes.len() {
                        return Err(Error::Transport(format!(
                            "Partial I2C write: sent {} of {} bytes",
                            written,
                            bytes.len()
                        )));
                    }
                }
                ZipStep::Read(len) => {
                    let mut buf = vec![0u8; *len];
                    let received = i2c.read(&mut buf)?;
                    read.extend_from_slice(&buf[..received]);
                }
                ZipStep::Delay(pause) => thread::sleep(*pause),
            }
        }
        Ok(read)
    }

    fn close(&mut self, handle: DeviceHandle) -> Result<()> {
        // rppal releases the bus file when the I2c value is dropped
        self.devices.remove(&handle.0).map(drop).ok_or(Error::HandleClosed)
    }
}

/// Edge notifier backed by rppal's asynchronous interrupts.
///
/// Ticks come from the kernel's edge timestamp, so interrupt-thread
/// scheduling delays do not leak into pulse widths.
pub struct RppalGpio {
    gpio: Gpio,
    inputs: HashMap<u8, InputPin>,
}

impl RppalGpio {
    pub fn new() -> Result<Self> {
        Ok(Self {
            gpio: Gpio::new()?,
            inputs: HashMap::new(),
        })
    }
}

/// Converts an rppal interrupt into an edge event.
///
/// The timestamp is truncated to a 32-bit microsecond tick, which wraps
/// like a hardware counter.
fn edge_event(pin: u8, timestamp: Duration, trigger: Trigger) -> EdgeEvent {
    let level = match trigger {
        Trigger::RisingEdge => Level::High,
        _ => Level::Low,
    };
    EdgeEvent {
        pin,
        level,
        tick: Tick(timestamp.as_micros() as u32),
    }
}

impl EdgeNotifier for RppalGpio {
    fn set_input(&mut self, pin: u8) -> Result<()> {
        let input = self.gpio.get(pin)?.into_input();
        self.inputs.insert(pin, input);
        Ok(())
    }

    fn register(&mut self, pin: u8, mut callback: EdgeCallback) -> Result<Registration> {
        let input = self.inputs.get_mut(&pin).ok_or_else(|| {
            Error::Gpio(format!("GPIO {} is not configured as input", pin))
        })?;
        // no debounce: both edges of short echoes must come through
        input.set_async_interrupt(Trigger::Both, None, move |event: gpio::Event| {
            callback(edge_event(pin, event.timestamp, event.trigger));
        })?;
        debug!("Registered either-edge interrupt on GPIO {}", pin);
        Ok(Registration(u32::from(pin)))
    }

    fn cancel(&mut self, registration: Registration) -> Result<()> {
        let pin = registration.0 as u8;
        match self.inputs.get_mut(&pin) {
            Some(input) => {
                input.clear_async_interrupt()?;
                debug!("Cleared interrupt on GPIO {}", pin);
                Ok(())
            }
            None => Err(Error::Gpio(format!("No registration on GPIO {}", pin))),
        }
    }
}
