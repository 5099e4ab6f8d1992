//! Driver facade: lifecycle and per-channel reads.

use crate::channel::Channel;
use crate::config::OctosonarConfig;
use crate::consts::{self, register};
use crate::convert::Reading;
use crate::edge::EdgeCycle;
use crate::error::{Error, Result};
use crate::notifier::{EdgeEvent, EdgeNotifier, Registration};
use crate::transport::{trigger_sequence, DeviceHandle, Transport};
use log::{debug, trace, warn};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// An open Octosonar board.
///
/// Owns the I2C handle and the INT-pin registration for its whole lifetime.
/// Reads take `&mut self`: the eight sonars share one interrupt line, so only
/// one ping may be in flight. Wrap the driver in a `Mutex` to share it
/// between threads; that serializes pings as well.
///
/// Dropping the driver runs [`cancel`](Self::cancel).
pub struct Octosonar<T: Transport, N: EdgeNotifier> {
    transport: T,
    notifier: N,
    config: OctosonarConfig,
    timeout: Duration,
    handle: Option<DeviceHandle>,
    registration: Option<Registration>,
    cycle: Arc<EdgeCycle>,
}

impl<T: Transport, N: EdgeNotifier> Octosonar<T, N> {
    /// Opens the board and starts listening on its INT pin.
    ///
    /// On failure nothing stays open: a handle opened before the failing
    /// step is closed and a registration is cancelled.
    pub fn setup(mut transport: T, mut notifier: N, config: OctosonarConfig) -> Result<Self> {
        config.validate()?;

        debug!(
            "Opening Octosonar on bus {} at 0x{:02X}, INT on GPIO {}",
            config.bus, config.address, config.interrupt_pin
        );
        let handle = transport.open(config.bus, config.address).map_err(|e| {
            Error::TransportUnavailable {
                bus: config.bus,
                address: config.address,
                message: e.to_string(),
            }
        })?;

        let cycle = Arc::new(EdgeCycle::new());
        match Self::configure(&mut transport, &mut notifier, &config, handle, &cycle) {
            Ok(registration) => {
                let timeout = config.timeout();
                debug!("Octosonar ready, echo timeout {:?}", timeout);
                Ok(Self {
                    transport,
                    notifier,
                    config,
                    timeout,
                    handle: Some(handle),
                    registration: Some(registration),
                    cycle,
                })
            }
            Err(e) => {
                if let Err(close_err) = transport.close(handle) {
                    warn!("Failed to close {} after setup error: {}", handle, close_err);
                }
                Err(e)
            }
        }
    }

    fn configure(
        transport: &mut T,
        notifier: &mut N,
        config: &OctosonarConfig,
        handle: DeviceHandle,
        cycle: &Arc<EdgeCycle>,
    ) -> Result<Registration> {
        // The PCF8574 powers up with all outputs high.
        transport
            .write_byte(handle, register::DESELECT_ALL)
            .map_err(|e| Error::TransportUnavailable {
                bus: config.bus,
                address: config.address,
                message: e.to_string(),
            })?;

        let pin = config.interrupt_pin;
        let gpio_err = |e: Error| Error::GpioConfigurationFailed {
            pin,
            message: e.to_string(),
        };
        notifier.set_input(pin).map_err(gpio_err)?;

        let edges = Arc::clone(cycle);
        let callback = Box::new(move |event: EdgeEvent| {
            trace!("Edge on GPIO {}: {:?} at {}", event.pin, event.level, event.tick);
            edges.on_edge(event.tick);
        });
        notifier.register(pin, callback).map_err(gpio_err)
    }

    /// Pings `channel` and waits for its echo.
    ///
    /// Returns the INT pulse width in microseconds, not halved for the round
    /// trip, or [`Reading::Timeout`] when nothing came back within the
    /// configured range. Bus failures are errors, never timeouts.
    pub fn read_raw(&mut self, channel: u8) -> Result<Reading> {
        let channel = Channel::new(channel)?;
        self.read_channel(channel)
    }

    /// Pings `channel` and returns the distance in centimetres, `None` on timeout.
    pub fn read_cm(&mut self, channel: u8) -> Result<Option<f64>> {
        Ok(self.read_raw(channel)?.centimeters())
    }

    /// Pings `channel` and returns the distance in inches, `None` on timeout.
    pub fn read_inch(&mut self, channel: u8) -> Result<Option<f64>> {
        Ok(self.read_raw(channel)?.inches())
    }

    /// Reads every channel in port order, pausing between pings so one
    /// sonar's late echo does not land in the next channel's cycle.
    pub fn sweep_cm(&mut self) -> Result<[Option<f64>; consts::CHANNEL_COUNT as usize]> {
        let mut distances = [None; consts::CHANNEL_COUNT as usize];
        for channel in Channel::all() {
            distances[channel.number() as usize] = self.read_channel(channel)?.centimeters();
            thread::sleep(consts::SWEEP_SETTLE);
        }
        Ok(distances)
    }

    fn read_channel(&mut self, channel: Channel) -> Result<Reading> {
        let handle = self.handle.ok_or(Error::HandleClosed)?;

        self.cycle.reset();
        let steps = trigger_sequence(self.config.address, channel);
        trace!("Triggering {}: {:02X?}", channel, steps);
        self.transport.transaction(handle, &steps)?;

        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(micros) = self.cycle.take() {
                trace!("{} echo {}us", channel, micros);
                return Ok(Reading::Echo(micros));
            }
            let now = Instant::now();
            if now >= deadline {
                trace!("{} timed out after {:?}", channel, self.timeout);
                return Ok(Reading::Timeout);
            }
            thread::sleep(self.config.poll_interval.min(deadline - now));
        }
    }

    /// Stops edge notifications, then closes the I2C handle.
    ///
    /// Calling it again is a no-op. If cancelling the registration fails the
    /// handle is still closed and the first error is returned.
    pub fn cancel(&mut self) -> Result<()> {
        let mut first_err = None;
        if let Some(registration) = self.registration.take() {
            debug!("Cancelling edge notifications on GPIO {}", self.config.interrupt_pin);
            if let Err(e) = self.notifier.cancel(registration) {
                first_err = Some(e);
            }
        }
        if let Some(handle) = self.handle.take() {
            debug!("Closing {}", handle);
            if let Err(e) = self.transport.close(handle) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Whether the driver still holds its I2C handle.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn config(&self) -> &OctosonarConfig {
        &self.config
    }

    /// Longest wait for an echo, derived from `max_range_cm`.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<T: Transport, N: EdgeNotifier> Drop for Octosonar<T, N> {
    fn drop(&mut self) {
        if let Err(e) = self.cancel() {
            warn!("Error while releasing Octosonar: {}", e);
        }
    }
}
