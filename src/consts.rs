//! Internal constants, register values, and defaults.

use std::time::Duration;

/// Speed of sound in air, metres per second.
pub const SPEED_OF_SOUND_M_PER_S: f64 = 340.29;
/// Speed of sound in air, inches per second.
pub const SPEED_OF_SOUND_IN_PER_S: f64 = 13397.244094;

/// Number of sonar ports on the board.
pub const CHANNEL_COUNT: u8 = 8;

/// Factory I2C address of the Octosonar's PCF8574 expander.
pub const DEFAULT_ADDRESS: u8 = 0x3D;
/// I2C bus on every Raspberry Pi except the first 256MB model.
pub const DEFAULT_BUS: u8 = 1;
/// HC-SR04 datasheet range.
pub const DEFAULT_MAX_RANGE_CM: f64 = 400.0;
/// Granularity of the wait loop in `read_raw`.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Pause between consecutive pings in a sweep, lets echoes from the previous
/// channel die out.
pub const SWEEP_SETTLE: Duration = Duration::from_millis(10);

// --- PCF8574 output register ---
pub mod register {
    /// All outputs low, no channel selected.
    pub const DESELECT_ALL: u8 = 0x00;
}

// --- Edge ordinals ---
pub mod edge {
    /// First edge after reset, records the start tick.
    pub const ORDINAL_START: u32 = 1;
    /// Second edge after reset, completes the pulse.
    pub const ORDINAL_END: u32 = 2;
    /// Any value past `ORDINAL_END`; edges are ignored until the next reset.
    pub const ORDINAL_IDLE: u32 = 3;
}
