//! Pulse width to distance conversion.

use crate::consts::{SPEED_OF_SOUND_IN_PER_S, SPEED_OF_SOUND_M_PER_S};

/// Outcome of a single ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// INT line pulse width in microseconds (round trip, not halved).
    Echo(u32),
    /// No echo within the configured maximum range.
    Timeout,
}

impl Reading {
    /// Raw pulse width, `None` on timeout.
    pub fn micros(&self) -> Option<u32> {
        match *self {
            Reading::Echo(us) => Some(us),
            Reading::Timeout => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Reading::Timeout)
    }

    /// One-way distance in centimetres, `None` on timeout.
    pub fn centimeters(&self) -> Option<f64> {
        self.micros().map(micros_to_cm)
    }

    /// One-way distance in inches, `None` on timeout.
    pub fn inches(&self) -> Option<f64> {
        self.micros().map(micros_to_inch)
    }
}

/// Converts a round-trip pulse width to one-way centimetres.
///
/// m/s ÷ 10000 gives cm/µs; a further ÷ 2 removes the return leg.
#[inline]
pub fn micros_to_cm(micros: u32) -> f64 {
    micros as f64 * (SPEED_OF_SOUND_M_PER_S / 20000.0)
}

/// Converts a round-trip pulse width to one-way inches.
#[inline]
pub fn micros_to_inch(micros: u32) -> f64 {
    micros as f64 * (SPEED_OF_SOUND_IN_PER_S / 2000000.0)
}
