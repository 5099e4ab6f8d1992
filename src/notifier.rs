//! GPIO edge notification abstraction.

use crate::error::Result;
use std::fmt;

/// Logic level reported with an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Monotonic microsecond timestamp of a GPIO event.
///
/// The counter is 32 bits wide and wraps roughly every 71.6 minutes;
/// differences are taken modulo 2^32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tick(pub u32);

impl Tick {
    /// Microseconds elapsed from `earlier` to `self`, wraparound-safe.
    #[inline]
    pub fn micros_since(self, earlier: Tick) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

/// A single edge seen on a watched pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvent {
    pub pin: u8,
    pub level: Level,
    pub tick: Tick,
}

/// Token returned by [`EdgeNotifier::register`], needed to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Registration(pub u32);

/// Callback invoked from the notifier's own thread on every edge.
pub type EdgeCallback = Box<dyn FnMut(EdgeEvent) + Send + 'static>;

/// GPIO input configuration and either-edge notification.
pub trait EdgeNotifier {
    /// Configures `pin` as an input.
    fn set_input(&mut self, pin: u8) -> Result<()>;

    /// Calls `callback` on every rising and falling edge of `pin`.
    fn register(&mut self, pin: u8, callback: EdgeCallback) -> Result<Registration>;

    /// Stops notifications for the registration. No callback runs after this returns.
    fn cancel(&mut self, registration: Registration) -> Result<()>;
}
